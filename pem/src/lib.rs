//! PEM textual armor ([RFC 7468](https://www.rfc-editor.org/rfc/rfc7468.html)).
//!
//! A [`Pem`] is a label plus the base64 body found between the
//! `-----BEGIN <label>-----` and `-----END <label>-----` boundaries.
//! Labels kagi understands are [`Label`] variants; anything else is kept
//! verbatim in [`Label::Other`] so callers can report what they actually got.

pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;
use kagi::decoder::{DecodableFrom, Decoder};
use regex::Regex;

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

/// Base64 text is wrapped at this many characters per line.
const LINE_WIDTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// PKCS#8 private key (non-encrypted)
    PrivateKey,
    /// PKCS#8 encrypted private key
    EncryptedPrivateKey,
    /// Any other label, e.g. `CERTIFICATE` or `RSA PRIVATE KEY`
    Other(String),
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::PrivateKey => write!(f, "{}", PRIVATE_KEY_LABEL),
            Label::EncryptedPrivateKey => write!(f, "{}", ENCRYPTED_PRIVATE_KEY_LABEL),
            Label::Other(label) => write!(f, "{}", label),
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(Error::InvalidLabel),
            PRIVATE_KEY_LABEL => Ok(Label::PrivateKey),
            ENCRYPTED_PRIVATE_KEY_LABEL => Ok(Label::EncryptedPrivateKey),
            other => Ok(Label::Other(other.to_string())),
        }
    }
}

impl Label {
    fn get_label(line: &str) -> Result<Label, Error> {
        let re = Regex::new(r"^-----(?:BEGIN|END) ([A-Z0-9 ]+)-----\s*$")
            .map_err(|_| Error::InvalidEncapsulationBoundary)?;
        let captured = re
            .captures(line)
            .ok_or(Error::InvalidEncapsulationBoundary)?;
        captured
            .get(1)
            .ok_or(Error::InvalidEncapsulationBoundary)
            .and_then(|c| Label::from_str(c.as_str()))
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    base64_data: String, // base64 encoded data, no line breaks
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem { label, base64_data }
    }

    /// Armors raw bytes under `label`.
    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        let base64_data = STANDARD.encode(data);
        Pem { label, base64_data }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        for chunk in self.base64_data.as_bytes().chunks(LINE_WIDTH) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        write!(f, "-----END {}-----", self.label)
    }
}

/// Types that can be written as PEM.
pub trait ToPem {
    /// The error type returned by to_pem
    type Error;

    /// The label this type is armored under.
    fn pem_label(&self) -> Label;

    fn to_pem(&self) -> Result<Pem, Self::Error>;
}

/// Types that can be read from PEM.
pub trait FromPem: Sized {
    /// The error type returned by from_pem
    type Error;

    /// The only label accepted by [`FromPem::from_pem`].
    fn expected_label() -> Label;

    fn from_pem(pem: &Pem) -> Result<Self, Self::Error>;
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        // This discards label information from Pem format.
        STANDARD.decode(self.data()).map_err(Error::Base64Decode)
    }
}

impl DecodableFrom<String> for Pem {}

impl Decoder<String, Pem> for String {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut state = PemParsingState::default();
        let mut label = None;
        let mut base64_lines = vec![];
        let mut base64_finl_lines = vec![];
        let mut lines = s.lines();
        loop {
            match state {
                PemParsingState::Init => match lines.next() {
                    Some(line) => {
                        // Explanatory text before the pre-eb is skipped.
                        if line.starts_with("-----BEGIN ") {
                            label = Some(Label::get_label(line)?);
                            state = PemParsingState::PreEncapsulationBoundary;
                        }
                    }
                    None => return Err(Error::MissingPreEncapsulationBoundary),
                },
                PemParsingState::PreEncapsulationBoundary => match lines.next() {
                    Some(line) => {
                        if line.trim().is_empty() || Label::get_label(line).is_ok() {
                            return Err(Error::MissingData);
                        }
                        if is_base64_finl(line) {
                            base64_finl_lines.push(line);
                            state = PemParsingState::Base64Finl;
                        } else {
                            base64_lines.push(line.trim_end());
                            state = PemParsingState::Base64Lines;
                        }
                    }
                    None => return Err(Error::MissingData),
                },
                PemParsingState::Base64Lines => match lines.next() {
                    Some(line) => {
                        if line.trim().is_empty() {
                            return Err(Error::InvalidBase64Line);
                        }
                        if let Ok(l) = Label::get_label(line) {
                            check_post_eb(label.as_ref(), &l)?;
                            state = PemParsingState::PostEncapsulationBoundary;
                        } else if is_base64_finl(line) {
                            base64_finl_lines.push(line);
                            state = PemParsingState::Base64Finl;
                        } else {
                            base64_lines.push(line.trim_end());
                        }
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::Base64Finl => match lines.next() {
                    Some(line) => {
                        if line.trim().is_empty() {
                            return Err(Error::InvalidBase64Finl);
                        }
                        if let Ok(l) = Label::get_label(line) {
                            check_post_eb(label.as_ref(), &l)?;
                            state = PemParsingState::PostEncapsulationBoundary;
                        } else {
                            if !is_base64_finl(line) {
                                return Err(Error::InvalidBase64Finl);
                            }
                            base64_finl_lines.push(line);
                        }
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::PostEncapsulationBoundary => break,
            }
        }
        let label = label.ok_or(Error::MissingPreEncapsulationBoundary)?;
        let finl = base64_finl(&base64_finl_lines)?;
        base64_lines.push(&finl);

        Ok(Pem {
            label,
            base64_data: base64_lines.join(""),
        })
    }
}

/*
* pre-eb ->          base64finl -> post-eb
*        -> base64lines-|---------->
*            |_|
 */
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
enum PemParsingState {
    #[default]
    Init,
    PreEncapsulationBoundary,
    Base64Lines,
    Base64Finl,
    PostEncapsulationBoundary,
}

fn check_post_eb(begin: Option<&Label>, end: &Label) -> Result<(), Error> {
    match begin {
        Some(begin) if begin == end => Ok(()),
        Some(begin) => Err(Error::LabelMismatch {
            begin: begin.to_string(),
            end: end.to_string(),
        }),
        None => Err(Error::MissingPreEncapsulationBoundary),
    }
}

fn base64_finl(lines: &[&str]) -> Result<String, Error> {
    // base64finl = *base64char (base64pad *WSP eol base64pad / *2base64pad) *WSP eol
    // exp-1)
    // ..AB=\s\s\s\n
    // =\s\s\n
    // exp-2)
    // ..AB==\s\s\n
    if lines.iter().any(|l| l.is_empty()) {
        return Err(Error::InvalidBase64Finl);
    }
    Ok(lines.iter().map(|l| l.trim()).collect::<Vec<&str>>().join(""))
}

fn is_base64_finl(line: &str) -> bool {
    line.contains('=')
}

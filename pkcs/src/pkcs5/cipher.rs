//! Content-encryption cipher identifiers (RFC 8018 Appendix B.2).
//!
//! These are the `encryptionScheme` half of PBES2 parameters. Every cipher
//! here runs in CBC mode with PKCS#7 padding and carries its IV in the
//! algorithm parameters.

use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use kagi_asn1::{Element, Integer, OctetString};
use kagi_pkix_types::{AlgorithmIdentifier, AlgorithmParameters};
use serde::{Serialize, ser::SerializeStruct};

use super::error::{Error, Result};
use super::{object_identifier, octet_array};

pub const OID_DES_CBC: &str = "1.3.14.3.2.7";
pub const OID_DES_EDE3_CBC: &str = "1.2.840.113549.3.7";
pub const OID_RC2_CBC: &str = "1.2.840.113549.3.2";
pub const OID_AES128_CBC: &str = "2.16.840.1.101.3.4.1.2";
pub const OID_AES192_CBC: &str = "2.16.840.1.101.3.4.1.22";
pub const OID_AES256_CBC: &str = "2.16.840.1.101.3.4.1.42";

/// Effective key bits used when `rc2ParameterVersion` is absent.
pub const RC2_DEFAULT_EFFECTIVE_BITS: u32 = 32;

/// RC2 key expansion works on 1 to 128 byte keys.
pub const RC2_MAX_KEY_LENGTH: usize = 128;

/// Block cipher in CBC mode, with its IV.
///
/// RC2 keeps the raw `rc2ParameterVersion` so that a decoded identifier
/// re-encodes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherAlgorithmIdentifier {
    DesCbc { iv: [u8; 8] },
    DesEde3Cbc { iv: [u8; 8] },
    Rc2Cbc { version: Option<u32>, iv: [u8; 8] },
    Aes128Cbc { iv: [u8; 16] },
    Aes192Cbc { iv: [u8; 16] },
    Aes256Cbc { iv: [u8; 16] },
}

impl CipherAlgorithmIdentifier {
    /// RC2-CBC with the given effective key bits.
    ///
    /// Bit counts with a legacy version code (40, 64, 128) use that code;
    /// anything from 256 up is written literally.
    pub fn rc2_cbc(effective_bits: u32, iv: [u8; 8]) -> Result<Self> {
        let version = match effective_bits {
            RC2_DEFAULT_EFFECTIVE_BITS => None,
            40 => Some(160),
            64 => Some(120),
            128 => Some(58),
            bits if bits >= 256 => Some(bits),
            bits => return Err(Error::InvalidRc2Version(bits)),
        };
        Ok(CipherAlgorithmIdentifier::Rc2Cbc { version, iv })
    }

    pub fn oid(&self) -> &'static str {
        match self {
            CipherAlgorithmIdentifier::DesCbc { .. } => OID_DES_CBC,
            CipherAlgorithmIdentifier::DesEde3Cbc { .. } => OID_DES_EDE3_CBC,
            CipherAlgorithmIdentifier::Rc2Cbc { .. } => OID_RC2_CBC,
            CipherAlgorithmIdentifier::Aes128Cbc { .. } => OID_AES128_CBC,
            CipherAlgorithmIdentifier::Aes192Cbc { .. } => OID_AES192_CBC,
            CipherAlgorithmIdentifier::Aes256Cbc { .. } => OID_AES256_CBC,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CipherAlgorithmIdentifier::DesCbc { .. } => "des-cbc",
            CipherAlgorithmIdentifier::DesEde3Cbc { .. } => "des-ede3-cbc",
            CipherAlgorithmIdentifier::Rc2Cbc { .. } => "rc2-cbc",
            CipherAlgorithmIdentifier::Aes128Cbc { .. } => "aes-128-cbc",
            CipherAlgorithmIdentifier::Aes192Cbc { .. } => "aes-192-cbc",
            CipherAlgorithmIdentifier::Aes256Cbc { .. } => "aes-256-cbc",
        }
    }

    pub fn iv(&self) -> &[u8] {
        match self {
            CipherAlgorithmIdentifier::DesCbc { iv }
            | CipherAlgorithmIdentifier::DesEde3Cbc { iv }
            | CipherAlgorithmIdentifier::Rc2Cbc { iv, .. } => iv.as_slice(),
            CipherAlgorithmIdentifier::Aes128Cbc { iv }
            | CipherAlgorithmIdentifier::Aes192Cbc { iv }
            | CipherAlgorithmIdentifier::Aes256Cbc { iv } => iv.as_slice(),
        }
    }

    pub fn block_size(&self) -> usize {
        self.iv().len()
    }

    /// Key length in bytes used when PBKDF2 parameters carry no `keyLength`.
    pub fn default_key_length(&self) -> Result<usize> {
        let len = match self {
            CipherAlgorithmIdentifier::DesCbc { .. } => 8,
            CipherAlgorithmIdentifier::DesEde3Cbc { .. } => 24,
            CipherAlgorithmIdentifier::Rc2Cbc { .. } => self.effective_key_bits()?.div_ceil(8) as usize,
            CipherAlgorithmIdentifier::Aes128Cbc { .. } => 16,
            CipherAlgorithmIdentifier::Aes192Cbc { .. } => 24,
            CipherAlgorithmIdentifier::Aes256Cbc { .. } => 32,
        };
        Ok(len)
    }

    /// Whether the cipher accepts keys of any length (RC2) or a fixed one.
    pub fn has_variable_key_length(&self) -> bool {
        matches!(self, CipherAlgorithmIdentifier::Rc2Cbc { .. })
    }

    /// Checks a key length in bytes against what the cipher accepts.
    pub fn check_key_length(&self, len: usize) -> Result<()> {
        let expected = self.default_key_length()?;
        let valid = if self.has_variable_key_length() {
            (1..=RC2_MAX_KEY_LENGTH).contains(&len)
        } else {
            len == expected
        };
        if !valid {
            return Err(Error::InvalidKeyLength {
                expected,
                actual: len,
            });
        }
        Ok(())
    }

    /// RC2 effective key bits. Other ciphers report their key size in bits.
    pub fn effective_key_bits(&self) -> Result<u32> {
        match self {
            CipherAlgorithmIdentifier::Rc2Cbc { version, .. } => match version {
                None => Ok(RC2_DEFAULT_EFFECTIVE_BITS),
                Some(160) => Ok(40),
                Some(120) => Ok(64),
                Some(58) => Ok(128),
                Some(v) if *v >= 256 => Ok(*v),
                Some(v) => Err(Error::InvalidRc2Version(*v)),
            },
            other => Ok(other.default_key_length()? as u32 * 8),
        }
    }
}

impl Serialize for CipherAlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CipherAlgorithmIdentifier", 4)?;
        state.serialize_field("algorithm", self.name())?;
        state.serialize_field("oid", self.oid())?;
        if let CipherAlgorithmIdentifier::Rc2Cbc { .. } = self {
            state.serialize_field("effective_key_bits", &self.effective_key_bits().ok())?;
        }
        state.serialize_field("iv", &OctetString::from(self.iv()))?;
        state.end()
    }
}

impl TryFrom<&AlgorithmIdentifier> for CipherAlgorithmIdentifier {
    type Error = Error;

    fn try_from(alg: &AlgorithmIdentifier) -> Result<Self> {
        let oid = alg.algorithm().to_string();
        let params = alg.parameters_element();
        let cipher = match oid.as_str() {
            OID_DES_CBC => CipherAlgorithmIdentifier::DesCbc {
                iv: iv_param(params.as_ref())?,
            },
            OID_DES_EDE3_CBC => CipherAlgorithmIdentifier::DesEde3Cbc {
                iv: iv_param(params.as_ref())?,
            },
            OID_AES128_CBC => CipherAlgorithmIdentifier::Aes128Cbc {
                iv: iv_param(params.as_ref())?,
            },
            OID_AES192_CBC => CipherAlgorithmIdentifier::Aes192Cbc {
                iv: iv_param(params.as_ref())?,
            },
            OID_AES256_CBC => CipherAlgorithmIdentifier::Aes256Cbc {
                iv: iv_param(params.as_ref())?,
            },
            OID_RC2_CBC => {
                // RC2-CBC-Parameter ::= SEQUENCE {
                //     rc2ParameterVersion INTEGER OPTIONAL,
                //     iv OCTET STRING (SIZE(8)) }
                let Some(Element::Sequence(elements)) = params else {
                    return Err(Error::InvalidParameters(
                        "RC2-CBC parameters must be a SEQUENCE",
                    ));
                };
                let (version, iv) = match elements.as_slice() {
                    [iv] => (None, iv),
                    [Element::Integer(version), iv] => {
                        let version = version
                            .to_u32()
                            .ok_or(Error::InvalidParameters("RC2 version out of range"))?;
                        (Some(version), iv)
                    }
                    _ => {
                        return Err(Error::InvalidParameters(
                            "RC2-CBC parameters must be [version] iv",
                        ));
                    }
                };
                let cipher = CipherAlgorithmIdentifier::Rc2Cbc {
                    version,
                    iv: iv_param(Some(iv))?,
                };
                // reject unknown version codes up front
                cipher.effective_key_bits()?;
                cipher
            }
            _ => return Err(Error::UnsupportedAlgorithm(alg.algorithm().clone())),
        };
        Ok(cipher)
    }
}

fn iv_param<const N: usize>(params: Option<&Element>) -> Result<[u8; N]> {
    let Some(Element::OctetString(iv)) = params else {
        return Err(Error::InvalidParameters("cipher IV must be an OCTET STRING"));
    };
    octet_array(iv.as_bytes()).map_err(|actual| Error::InvalidIvLength {
        expected: N,
        actual,
    })
}

impl DecodableFrom<Element> for CipherAlgorithmIdentifier {}

impl Decoder<Element, CipherAlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CipherAlgorithmIdentifier> {
        let alg: AlgorithmIdentifier = self.decode()?;
        CipherAlgorithmIdentifier::try_from(&alg)
    }
}

impl From<&CipherAlgorithmIdentifier> for AlgorithmParameters {
    fn from(cipher: &CipherAlgorithmIdentifier) -> Self {
        let iv = Element::OctetString(OctetString::from(cipher.iv()));
        match cipher {
            CipherAlgorithmIdentifier::Rc2Cbc {
                version: Some(version),
                ..
            } => AlgorithmParameters::Elm(Element::Sequence(vec![
                Element::Integer(Integer::from(*version)),
                iv,
            ])),
            CipherAlgorithmIdentifier::Rc2Cbc { version: None, .. } => {
                AlgorithmParameters::Elm(Element::Sequence(vec![iv]))
            }
            _ => AlgorithmParameters::Elm(iv),
        }
    }
}

impl EncodableTo<CipherAlgorithmIdentifier> for Element {}

impl Encoder<CipherAlgorithmIdentifier, Element> for CipherAlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let alg = AlgorithmIdentifier::new_with_params(
            object_identifier(self.oid())?,
            AlgorithmParameters::from(self),
        );
        Ok(alg.encode()?)
    }
}

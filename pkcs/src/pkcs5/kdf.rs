//! Password based key derivation (RFC 8018 Section 5).

use hmac::Hmac;
use kagi::decoder::{DecodableFrom, Decoder};
use kagi::encoder::{EncodableTo, Encoder};
use kagi_asn1::Element;
use kagi_pkix_types::{AlgorithmIdentifier, AlgorithmParameters};
use md5::Md5;
use pbkdf2::pbkdf2;
use serde::Serialize;
use sha1::{Digest, Sha1};
use sha2::{Sha224, Sha256, Sha384, Sha512};
use tracing::trace;
use zeroize::Zeroizing;

use super::error::{Error, Result};
use super::object_identifier;

pub const OID_HMAC_WITH_SHA1: &str = "1.2.840.113549.2.7";
pub const OID_HMAC_WITH_SHA224: &str = "1.2.840.113549.2.8";
pub const OID_HMAC_WITH_SHA256: &str = "1.2.840.113549.2.9";
pub const OID_HMAC_WITH_SHA384: &str = "1.2.840.113549.2.10";
pub const OID_HMAC_WITH_SHA512: &str = "1.2.840.113549.2.11";

/// Pseudorandom function for PBKDF2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Prf {
    /// The PBKDF2-params default.
    #[default]
    HmacWithSha1,
    HmacWithSha224,
    HmacWithSha256,
    HmacWithSha384,
    HmacWithSha512,
}

impl Prf {
    pub fn oid(&self) -> &'static str {
        match self {
            Prf::HmacWithSha1 => OID_HMAC_WITH_SHA1,
            Prf::HmacWithSha224 => OID_HMAC_WITH_SHA224,
            Prf::HmacWithSha256 => OID_HMAC_WITH_SHA256,
            Prf::HmacWithSha384 => OID_HMAC_WITH_SHA384,
            Prf::HmacWithSha512 => OID_HMAC_WITH_SHA512,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Prf::HmacWithSha1 => "hmacWithSHA1",
            Prf::HmacWithSha224 => "hmacWithSHA224",
            Prf::HmacWithSha256 => "hmacWithSHA256",
            Prf::HmacWithSha384 => "hmacWithSHA384",
            Prf::HmacWithSha512 => "hmacWithSHA512",
        }
    }
}

impl Serialize for Prf {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl TryFrom<&AlgorithmIdentifier> for Prf {
    type Error = Error;

    fn try_from(alg: &AlgorithmIdentifier) -> Result<Self> {
        let prf = match alg.algorithm().to_string().as_str() {
            OID_HMAC_WITH_SHA1 => Prf::HmacWithSha1,
            OID_HMAC_WITH_SHA224 => Prf::HmacWithSha224,
            OID_HMAC_WITH_SHA256 => Prf::HmacWithSha256,
            OID_HMAC_WITH_SHA384 => Prf::HmacWithSha384,
            OID_HMAC_WITH_SHA512 => Prf::HmacWithSha512,
            _ => return Err(Error::UnsupportedAlgorithm(alg.algorithm().clone())),
        };
        // parameters are NULL, but some encoders leave them out
        match alg.parameters() {
            None | Some(AlgorithmParameters::Null) => Ok(prf),
            Some(AlgorithmParameters::Elm(_)) => {
                Err(Error::InvalidParameters("PRF parameters must be NULL"))
            }
        }
    }
}

impl DecodableFrom<Element> for Prf {}

impl Decoder<Element, Prf> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Prf> {
        let alg: AlgorithmIdentifier = self.decode()?;
        Prf::try_from(&alg)
    }
}

impl EncodableTo<Prf> for Element {}

impl Encoder<Prf, Element> for Prf {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let alg = AlgorithmIdentifier::new_with_params(
            object_identifier(self.oid())?,
            AlgorithmParameters::Null,
        );
        Ok(alg.encode()?)
    }
}

/// Hash used by PBKDF1 in PBES1 schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pbkdf1Digest {
    Md5,
    Sha1,
}

impl Pbkdf1Digest {
    pub fn name(&self) -> &'static str {
        match self {
            Pbkdf1Digest::Md5 => "md5",
            Pbkdf1Digest::Sha1 => "sha1",
        }
    }

    pub fn output_size(&self) -> usize {
        match self {
            Pbkdf1Digest::Md5 => <Md5 as Digest>::output_size(),
            Pbkdf1Digest::Sha1 => <Sha1 as Digest>::output_size(),
        }
    }
}

/// Key derivation function bound to a hash or PRF.
///
/// The salt and iteration count come from the algorithm parameters and are
/// passed to [`Kdf::derive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Kdf {
    Pbkdf1 { digest: Pbkdf1Digest },
    Pbkdf2 { prf: Prf },
}

impl Kdf {
    pub fn name(&self) -> &'static str {
        match self {
            Kdf::Pbkdf1 { .. } => "PBKDF1",
            Kdf::Pbkdf2 { .. } => "PBKDF2",
        }
    }

    /// Derives `key_len` bytes from `password`.
    ///
    /// PBKDF1 cannot produce more than one digest worth of output.
    pub fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        key_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        if iterations == 0 {
            return Err(Error::InvalidIterationCount);
        }
        trace!(
            kdf = self.name(),
            salt_len = salt.len(),
            iterations,
            key_len,
            "deriving key"
        );

        match self {
            Kdf::Pbkdf1 { digest } => match digest {
                Pbkdf1Digest::Md5 => pbkdf1::<Md5>(password, salt, iterations, key_len),
                Pbkdf1Digest::Sha1 => pbkdf1::<Sha1>(password, salt, iterations, key_len),
            },
            Kdf::Pbkdf2 { prf } => {
                let mut key = Zeroizing::new(vec![0u8; key_len]);
                let out = key.as_mut_slice();
                match prf {
                    Prf::HmacWithSha1 => pbkdf2::<Hmac<Sha1>>(password, salt, iterations, out),
                    Prf::HmacWithSha224 => pbkdf2::<Hmac<Sha224>>(password, salt, iterations, out),
                    Prf::HmacWithSha256 => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, out),
                    Prf::HmacWithSha384 => pbkdf2::<Hmac<Sha384>>(password, salt, iterations, out),
                    Prf::HmacWithSha512 => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, out),
                }
                .map_err(|_| Error::InvalidKeyOrIvLength)?;
                Ok(key)
            }
        }
    }
}

// T_1 = Hash(P || S), T_i = Hash(T_{i-1}), DK = T_c<0..dkLen>
fn pbkdf1<D: Digest>(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let max = <D as Digest>::output_size();
    if key_len > max {
        return Err(Error::DerivedKeyTooLong {
            max,
            requested: key_len,
        });
    }

    let mut t = Zeroizing::new(
        D::new()
            .chain_update(password)
            .chain_update(salt)
            .finalize()
            .to_vec(),
    );
    for _ in 1..iterations {
        t = Zeroizing::new(D::digest(t.as_slice()).to_vec());
    }
    t.truncate(key_len);
    Ok(t)
}

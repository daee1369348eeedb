//! PKCS#5: Password-Based Cryptography Specification
//!
//! This module implements the parts of [RFC 8018](https://datatracker.ietf.org/doc/html/rfc8018)
//! used to protect PKCS#8 private keys:
//!
//! - PBES1 (`pbeWithMD5AndDES-CBC`, `pbeWithMD5AndRC2-CBC`, `pbeWithSHA1AndDES-CBC`,
//!   `pbeWithSHA1AndRC2-CBC`) with PBKDF1
//! - PBES2 with PBKDF2 (HMAC-SHA1/224/256/384/512) and DES, 3DES, RC2 or AES in CBC mode
//!
//! Cipher primitives are provided through the [`Crypto`] trait so callers can
//! plug in their own engine; [`default_crypto`] is backed by RustCrypto.

mod algorithm;
mod cipher;
mod crypto;
mod kdf;
mod scheme;

pub mod error;

use std::str::FromStr;

use kagi_asn1::{Element, ObjectIdentifier, OctetString};
use serde::Serialize;

pub use algorithm::{
    OID_PBE_WITH_MD5_AND_DES_CBC, OID_PBE_WITH_MD5_AND_RC2_CBC, OID_PBE_WITH_SHA1_AND_DES_CBC,
    OID_PBE_WITH_SHA1_AND_RC2_CBC, OID_PBES2, OID_PBKDF2, PbeAlgorithmIdentifier, Pbes1Parameters,
    Pbes1Scheme, Pbes2Parameters, Pbkdf2Parameters,
};
pub use cipher::{
    CipherAlgorithmIdentifier, OID_AES128_CBC, OID_AES192_CBC, OID_AES256_CBC, OID_DES_CBC,
    OID_DES_EDE3_CBC, OID_RC2_CBC,
};
pub use crypto::{Crypto, RustCryptoEngine, default_crypto};
pub use error::{Error, Result};
pub use kdf::{
    Kdf, OID_HMAC_WITH_SHA1, OID_HMAC_WITH_SHA224, OID_HMAC_WITH_SHA256, OID_HMAC_WITH_SHA384,
    OID_HMAC_WITH_SHA512, Pbkdf1Digest, Prf,
};
pub use scheme::PbeScheme;

fn object_identifier(oid: &str) -> Result<ObjectIdentifier> {
    Ok(ObjectIdentifier::from_str(oid)?)
}

/// Copies `bytes` into a fixed array, or returns the actual length.
fn octet_array<const N: usize>(bytes: &[u8]) -> std::result::Result<[u8; N], usize> {
    bytes.try_into().map_err(|_| bytes.len())
}

/// Reads an `iterationCount INTEGER (1..MAX)`.
fn iteration_count(element: &Element) -> Result<u32> {
    let Element::Integer(count) = element else {
        return Err(Error::InvalidParameters(
            "iteration count must be an INTEGER",
        ));
    };
    match count.to_u32() {
        Some(0) | None => Err(Error::InvalidIterationCount),
        Some(count) => Ok(count),
    }
}

fn serialize_hex<S>(bytes: &impl AsRef<[u8]>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    OctetString::from(bytes.as_ref()).serialize(serializer)
}

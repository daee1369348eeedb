use kagi_asn1::ObjectIdentifier;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(ObjectIdentifier),

    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("invalid salt length: expected {expected}, got {actual}")]
    InvalidSaltLength { expected: usize, actual: usize },

    #[error("invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("iteration count must be between 1 and {}", u32::MAX)]
    InvalidIterationCount,

    #[error("unsupported RC2 parameter version: {0}")]
    InvalidRc2Version(u32),

    #[error("derived key too long: requested {requested}, max {max}")]
    DerivedKeyTooLong { max: usize, requested: usize },

    #[error("invalid padding")]
    Padding,

    #[error("invalid key or IV length for cipher")]
    InvalidKeyOrIvLength,

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] kagi_asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] kagi_pkix_types::Error),
}

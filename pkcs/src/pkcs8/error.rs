use kagi_asn1::ObjectIdentifier;
use kagi_pem::Label;
use thiserror::Error;

use crate::pkcs5;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed structure: {0}")]
    MalformedStructure(#[from] StructureError),

    #[error("wrong container type: expected {expected}, found {found}")]
    WrongContainerType { expected: Label, found: Label },

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(ObjectIdentifier),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(#[source] DecryptionError),

    #[error("PBE scheme error: {0}")]
    Scheme(#[source] pkcs5::Error),
}

/// Why an input was rejected by the codec.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("{0}")]
    Shape(String),

    #[error("DER error: {0}")]
    Der(#[from] kagi_der::error::Error),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] kagi_asn1::error::Error),

    #[error("PEM error: {0}")]
    Pem(#[from] kagi_pem::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] kagi_pkix_types::Error),

    #[error("PBE parameters: {0}")]
    Pkcs5(#[source] pkcs5::Error),
}

#[derive(Debug, Error)]
pub enum DecryptionError {
    #[error("{0}")]
    Scheme(#[source] pkcs5::Error),

    #[error("decrypted data is not a private key: {0}")]
    PrivateKey(#[source] Box<Error>),
}

impl Error {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Error::MalformedStructure(StructureError::Shape(msg.into()))
    }

    /// Maps an algorithm identifier resolution failure.
    pub(crate) fn from_resolver(err: pkcs5::Error) -> Self {
        match err {
            pkcs5::Error::UnsupportedAlgorithm(oid) => Error::UnsupportedAlgorithm(oid),
            pkcs5::Error::Asn1(err) => Error::MalformedStructure(StructureError::Asn1(err)),
            pkcs5::Error::PkixTypes(err) => Error::MalformedStructure(StructureError::PkixTypes(err)),
            other => Error::MalformedStructure(StructureError::Pkcs5(other)),
        }
    }
}

impl From<kagi_der::error::Error> for Error {
    fn from(err: kagi_der::error::Error) -> Self {
        Error::MalformedStructure(err.into())
    }
}

impl From<kagi_asn1::error::Error> for Error {
    fn from(err: kagi_asn1::error::Error) -> Self {
        Error::MalformedStructure(err.into())
    }
}

impl From<kagi_pem::error::Error> for Error {
    fn from(err: kagi_pem::error::Error) -> Self {
        Error::MalformedStructure(err.into())
    }
}

impl From<kagi_pkix_types::Error> for Error {
    fn from(err: kagi_pkix_types::Error) -> Self {
        Error::MalformedStructure(err.into())
    }
}

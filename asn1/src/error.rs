//! Error types for ASN.1 parsing and encoding.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors that can occur during ASN.1 parsing and encoding operations.
#[derive(Debug, Error)]
pub enum Error {
    // Boolean errors
    #[error("invalid boolean")]
    InvalidBoolean,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,
    #[error("INTEGER: value out of range for {0}")]
    IntegerOutOfRange(&'static str),

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: first two components {0}.{1} are out of range")]
    ObjectIdentifierInvalidRoot(u64, u64),
    #[error("OBJECT IDENTIFIER: invalid component: {0}")]
    ObjectIdentifierInvalidComponent(#[source] ParseIntError),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    // String type errors
    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,
    #[error("PrintableString: invalid encoding")]
    PrintableStringInvalidEncoding,
    #[error("IA5String: invalid encoding")]
    Ia5StringInvalidEncoding,

    // Context-specific errors
    #[error("invalid context-specific value [{slot}]: {msg}")]
    InvalidContextSpecific { slot: u8, msg: &'static str },

    // DER errors
    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[from] kagi_der::error::Error),

    // Element errors
    #[error("no element found")]
    NoElement,
    #[error("trailing data after element")]
    TrailingData,
    #[error("element: IMPLICIT tagging requires a primitive inner element")]
    ElementImplicitNotPrimitive,
}

pub type Result<T> = std::result::Result<T, Error>;

//! PKIX common types.
//!
//! Only the RFC 5280 `AlgorithmIdentifier` lives here; it is the envelope
//! every PKCS#5 and PKCS#8 algorithm is carried in.

pub mod algorithm;
pub mod error;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters};
pub use error::{Error, Result};

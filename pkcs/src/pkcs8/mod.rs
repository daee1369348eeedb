//! PKCS#8: Private-Key Information Syntax Specification
//!
//! This module implements [RFC 5958](https://datatracker.ietf.org/doc/html/rfc5958) (Asymmetric Key Packages)
//! which obsoletes RFC 5208 (PKCS#8 v1.2).
//!
//! [`PrivateKeyInfo`] carries a plaintext key; [`EncryptedPrivateKeyInfo`]
//! carries the same key encrypted with a PKCS#5 password based scheme.

mod encrypted;

pub mod error;
pub mod types;

pub use encrypted::{EncryptedPrivateKeyInfo, EncryptionAlgorithmIdentifier};
pub use error::{DecryptionError, Error, Result, StructureError};
pub use kagi_pkix_types::{AlgorithmIdentifier, AlgorithmParameters};
pub use types::{OneAsymmetricKey, PrivateKeyInfo, Version};

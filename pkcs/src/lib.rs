//! # kagi-pkcs
//!
//! Password based encryption of private keys.
//!
//! - [`pkcs5`]: PBES1 and PBES2 algorithm identifiers (RFC 8018), key
//!   derivation, and the pluggable [`pkcs5::Crypto`] engine.
//! - [`pkcs8`]: `PrivateKeyInfo` and `EncryptedPrivateKeyInfo` (RFC 5958).

pub mod pkcs5;
pub mod pkcs8;

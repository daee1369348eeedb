//! PBES1 and PBES2 encryption schemes (RFC 8018 Section 6).

use std::fmt;

use tracing::debug;
use zeroize::Zeroizing;

use super::algorithm::PbeAlgorithmIdentifier;
use super::cipher::CipherAlgorithmIdentifier;
use super::crypto::{Crypto, default_crypto};
use super::error::{Error, Result};
use super::kdf::Kdf;

/// PBES1 derives a DES/RC2 key followed by the IV.
const PBES1_DERIVED_KEY_LENGTH: usize = 16;

/// A PBE algorithm bound to a crypto engine.
#[derive(Clone)]
pub struct PbeScheme<'a> {
    algorithm: PbeAlgorithmIdentifier,
    crypto: &'a dyn Crypto,
}

impl fmt::Debug for PbeScheme<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PbeScheme")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl<'a> PbeScheme<'a> {
    /// Builds the scheme for `algorithm`, using `crypto` or the default engine.
    pub fn from_algorithm_identifier(
        algorithm: &PbeAlgorithmIdentifier,
        crypto: Option<&'a dyn Crypto>,
    ) -> Result<Self> {
        // keyLength is checked before any key derivation sizes a buffer from it
        if let PbeAlgorithmIdentifier::Pbes2(params) = algorithm {
            params.check_key_length()?;
        }
        debug!(
            scheme = algorithm.name(),
            iterations = algorithm.iterations(),
            custom_engine = crypto.is_some(),
            "resolved PBE scheme"
        );
        Ok(PbeScheme {
            algorithm: algorithm.clone(),
            crypto: crypto.unwrap_or(default_crypto()),
        })
    }

    pub fn algorithm(&self) -> &PbeAlgorithmIdentifier {
        &self.algorithm
    }

    pub fn kdf(&self) -> Kdf {
        match &self.algorithm {
            PbeAlgorithmIdentifier::Pbes1(params) => Kdf::Pbkdf1 {
                digest: params.scheme.digest(),
            },
            PbeAlgorithmIdentifier::Pbes2(params) => params.kdf.kdf(),
        }
    }

    pub fn salt(&self) -> &[u8] {
        self.algorithm.salt()
    }

    pub fn iterations(&self) -> u32 {
        self.algorithm.iterations()
    }

    /// Number of bytes [`PbeScheme::derive_key`] produces and
    /// [`PbeScheme::encrypt_with_key`] expects.
    pub fn key_length(&self) -> Result<usize> {
        match &self.algorithm {
            PbeAlgorithmIdentifier::Pbes1(_) => Ok(PBES1_DERIVED_KEY_LENGTH),
            PbeAlgorithmIdentifier::Pbes2(params) => match params.kdf.key_length {
                Some(key_length) => Ok(key_length as usize),
                None => params.cipher.default_key_length(),
            },
        }
    }

    pub fn derive_key(&self, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        self.kdf()
            .derive(password, self.salt(), self.iterations(), self.key_length()?)
    }

    pub fn encrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>> {
        let key = self.derive_key(password)?;
        self.encrypt_with_key(data, &key)
    }

    pub fn decrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>> {
        let key = self.derive_key(password)?;
        self.decrypt_with_key(data, &key)
    }

    pub fn encrypt_with_key(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        debug!(scheme = self.algorithm.name(), len = data.len(), "encrypting");
        let (key, cipher) = self.cipher_key(key)?;
        self.crypto.encrypt(data, key, &cipher)
    }

    pub fn decrypt_with_key(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        debug!(scheme = self.algorithm.name(), len = data.len(), "decrypting");
        let (key, cipher) = self.cipher_key(key)?;
        self.crypto.decrypt(data, key, &cipher)
    }

    /// Splits derived key material into the cipher key and cipher parameters.
    fn cipher_key<'k>(&self, key: &'k [u8]) -> Result<(&'k [u8], CipherAlgorithmIdentifier)> {
        let expected = self.key_length()?;
        if key.len() != expected {
            return Err(Error::InvalidKeyLength {
                expected,
                actual: key.len(),
            });
        }
        match &self.algorithm {
            PbeAlgorithmIdentifier::Pbes1(params) => {
                let (key, iv) = key.split_at(8);
                let iv: [u8; 8] = iv.try_into().map_err(|_| Error::InvalidKeyOrIvLength)?;
                Ok((key, params.scheme.cipher(iv)))
            }
            PbeAlgorithmIdentifier::Pbes2(params) => Ok((key, params.cipher.clone())),
        }
    }
}

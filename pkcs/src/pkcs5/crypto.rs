//! Block cipher engine.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit};
use des::{Des, TdesEde3};
use rc2::Rc2;

use super::cipher::CipherAlgorithmIdentifier;
use super::error::{Error, Result};

/// CBC encryption with PKCS#7 padding for the ciphers PBES1 and PBES2 use.
///
/// `key` is the raw cipher key; the IV is taken from `cipher`.
pub trait Crypto: Send + Sync {
    fn encrypt(
        &self,
        data: &[u8],
        key: &[u8],
        cipher: &CipherAlgorithmIdentifier,
    ) -> Result<Vec<u8>>;

    fn decrypt(
        &self,
        data: &[u8],
        key: &[u8],
        cipher: &CipherAlgorithmIdentifier,
    ) -> Result<Vec<u8>>;
}

/// [`Crypto`] backed by the RustCrypto block cipher crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustCryptoEngine;

static DEFAULT_CRYPTO: RustCryptoEngine = RustCryptoEngine;

/// Engine used when the caller does not supply one.
pub fn default_crypto() -> &'static dyn Crypto {
    &DEFAULT_CRYPTO
}

impl Crypto for RustCryptoEngine {
    fn encrypt(
        &self,
        data: &[u8],
        key: &[u8],
        cipher: &CipherAlgorithmIdentifier,
    ) -> Result<Vec<u8>> {
        cipher.check_key_length(key.len())?;
        let iv = cipher.iv();
        match cipher {
            CipherAlgorithmIdentifier::DesCbc { .. } => encrypt_cbc(key_init::<Des>(key)?, iv, data),
            CipherAlgorithmIdentifier::DesEde3Cbc { .. } => {
                encrypt_cbc(key_init::<TdesEde3>(key)?, iv, data)
            }
            CipherAlgorithmIdentifier::Rc2Cbc { .. } => encrypt_cbc(rc2(key, cipher)?, iv, data),
            CipherAlgorithmIdentifier::Aes128Cbc { .. } => {
                encrypt_cbc(key_init::<Aes128>(key)?, iv, data)
            }
            CipherAlgorithmIdentifier::Aes192Cbc { .. } => {
                encrypt_cbc(key_init::<Aes192>(key)?, iv, data)
            }
            CipherAlgorithmIdentifier::Aes256Cbc { .. } => {
                encrypt_cbc(key_init::<Aes256>(key)?, iv, data)
            }
        }
    }

    fn decrypt(
        &self,
        data: &[u8],
        key: &[u8],
        cipher: &CipherAlgorithmIdentifier,
    ) -> Result<Vec<u8>> {
        cipher.check_key_length(key.len())?;
        let iv = cipher.iv();
        match cipher {
            CipherAlgorithmIdentifier::DesCbc { .. } => decrypt_cbc(key_init::<Des>(key)?, iv, data),
            CipherAlgorithmIdentifier::DesEde3Cbc { .. } => {
                decrypt_cbc(key_init::<TdesEde3>(key)?, iv, data)
            }
            CipherAlgorithmIdentifier::Rc2Cbc { .. } => decrypt_cbc(rc2(key, cipher)?, iv, data),
            CipherAlgorithmIdentifier::Aes128Cbc { .. } => {
                decrypt_cbc(key_init::<Aes128>(key)?, iv, data)
            }
            CipherAlgorithmIdentifier::Aes192Cbc { .. } => {
                decrypt_cbc(key_init::<Aes192>(key)?, iv, data)
            }
            CipherAlgorithmIdentifier::Aes256Cbc { .. } => {
                decrypt_cbc(key_init::<Aes256>(key)?, iv, data)
            }
        }
    }
}

fn key_init<C: KeyInit>(key: &[u8]) -> Result<C> {
    C::new_from_slice(key).map_err(|_| Error::InvalidKeyOrIvLength)
}

fn rc2(key: &[u8], cipher: &CipherAlgorithmIdentifier) -> Result<Rc2> {
    let bits = cipher.effective_key_bits()?;
    if !(1..=1024).contains(&bits) {
        return Err(Error::InvalidRc2Version(bits));
    }
    Ok(Rc2::new_with_eff_key_len(key, bits as usize))
}

fn encrypt_cbc<C>(cipher: C, iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher,
{
    let encryptor = cbc::Encryptor::<C>::inner_iv_slice_init(cipher, iv)
        .map_err(|_| Error::InvalidKeyOrIvLength)?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn decrypt_cbc<C>(cipher: C, iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher,
{
    let decryptor = cbc::Decryptor::<C>::inner_iv_slice_init(cipher, iv)
        .map_err(|_| Error::InvalidKeyOrIvLength)?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| Error::Padding)
}

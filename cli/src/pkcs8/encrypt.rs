use std::str::FromStr;

use clap::{Args, ValueEnum};
use kagi_pem::ToPem;
use kagi_pkcs::pkcs5::{
    CipherAlgorithmIdentifier, PbeAlgorithmIdentifier, Pbes1Scheme, Pbkdf2Parameters, Prf,
};
use kagi_pkcs::pkcs8::{EncryptedPrivateKeyInfo, PrivateKeyInfo};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::utils::{random_bytes, read_pem_input};

/// Salt length for both PBES1 and PBES2.
const SALT_LEN: usize = 8;

/// RC2 effective key bits used for PBES2 rc2-cbc.
const RC2_KEY_BITS: u32 = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Scheme {
    #[value(name = "pbes2-aes-256-cbc")]
    Pbes2Aes256Cbc,
    #[value(name = "pbes2-aes-192-cbc")]
    Pbes2Aes192Cbc,
    #[value(name = "pbes2-aes-128-cbc")]
    Pbes2Aes128Cbc,
    #[value(name = "pbes2-des-ede3-cbc")]
    Pbes2DesEde3Cbc,
    #[value(name = "pbes2-des-cbc")]
    Pbes2DesCbc,
    #[value(name = "pbes2-rc2-cbc")]
    Pbes2Rc2Cbc,
    #[value(name = "pbe-md5-des")]
    PbeMd5Des,
    #[value(name = "pbe-md5-rc2")]
    PbeMd5Rc2,
    #[value(name = "pbe-sha1-des")]
    PbeSha1Des,
    #[value(name = "pbe-sha1-rc2")]
    PbeSha1Rc2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PrfName {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl From<PrfName> for Prf {
    fn from(name: PrfName) -> Self {
        match name {
            PrfName::Sha1 => Prf::HmacWithSha1,
            PrfName::Sha224 => Prf::HmacWithSha224,
            PrfName::Sha256 => Prf::HmacWithSha256,
            PrfName::Sha384 => Prf::HmacWithSha384,
            PrfName::Sha512 => Prf::HmacWithSha512,
        }
    }
}

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the PRIVATE KEY PEM file. If not specified, reads from stdin
    pub(crate) file: Option<String>,

    /// Password to encrypt with
    #[arg(short, long, env = "KAGI_PASSWORD", hide_env_values = true)]
    pub(crate) password: String,

    /// Encryption scheme
    #[arg(short, long, value_enum, default_value = "pbes2-aes-256-cbc")]
    pub(crate) scheme: Scheme,

    /// Key derivation iteration count
    #[arg(short, long, default_value_t = 2048, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) iterations: u32,

    /// PBKDF2 pseudorandom function (PBES2 only)
    #[arg(long, value_enum, default_value = "sha256")]
    pub(crate) prf: PrfName,
}

fn pbes1(scheme: Pbes1Scheme, iterations: u32) -> Result<PbeAlgorithmIdentifier> {
    Ok(PbeAlgorithmIdentifier::pbes1(
        scheme,
        random_bytes::<SALT_LEN>()?,
        iterations,
    ))
}

fn pbes2(
    cipher: CipherAlgorithmIdentifier,
    iterations: u32,
    prf: Prf,
) -> Result<PbeAlgorithmIdentifier> {
    // variable length ciphers carry an explicit keyLength
    let key_length = if cipher.has_variable_key_length() {
        Some(u32::try_from(cipher.default_key_length()?).map_err(|e| e.to_string())?)
    } else {
        None
    };
    // hmacWithSHA1 is the DEFAULT and is omitted in DER
    let prf = (prf != Prf::HmacWithSha1).then_some(prf);
    let kdf = Pbkdf2Parameters::new(
        random_bytes::<SALT_LEN>()?.to_vec(),
        iterations,
        key_length,
        prf,
    );
    Ok(PbeAlgorithmIdentifier::pbes2(kdf, cipher))
}

/// Builds fresh algorithm parameters with a random salt and IV.
pub(crate) fn build_algorithm(
    scheme: Scheme,
    iterations: u32,
    prf: Prf,
) -> Result<PbeAlgorithmIdentifier> {
    match scheme {
        Scheme::Pbes2Aes256Cbc => pbes2(
            CipherAlgorithmIdentifier::Aes256Cbc { iv: random_bytes()? },
            iterations,
            prf,
        ),
        Scheme::Pbes2Aes192Cbc => pbes2(
            CipherAlgorithmIdentifier::Aes192Cbc { iv: random_bytes()? },
            iterations,
            prf,
        ),
        Scheme::Pbes2Aes128Cbc => pbes2(
            CipherAlgorithmIdentifier::Aes128Cbc { iv: random_bytes()? },
            iterations,
            prf,
        ),
        Scheme::Pbes2DesEde3Cbc => pbes2(
            CipherAlgorithmIdentifier::DesEde3Cbc { iv: random_bytes()? },
            iterations,
            prf,
        ),
        Scheme::Pbes2DesCbc => pbes2(
            CipherAlgorithmIdentifier::DesCbc { iv: random_bytes()? },
            iterations,
            prf,
        ),
        Scheme::Pbes2Rc2Cbc => pbes2(
            CipherAlgorithmIdentifier::rc2_cbc(RC2_KEY_BITS, random_bytes()?)?,
            iterations,
            prf,
        ),
        Scheme::PbeMd5Des => pbes1(Pbes1Scheme::Md5DesCbc, iterations),
        Scheme::PbeMd5Rc2 => pbes1(Pbes1Scheme::Md5Rc2Cbc, iterations),
        Scheme::PbeSha1Des => pbes1(Pbes1Scheme::Sha1DesCbc, iterations),
        Scheme::PbeSha1Rc2 => pbes1(Pbes1Scheme::Sha1Rc2Cbc, iterations),
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let password = Zeroizing::new(config.password);
    let contents = Zeroizing::new(read_pem_input(config.file.as_deref())?);

    let key = PrivateKeyInfo::from_str(&contents)?;
    let algorithm = build_algorithm(config.scheme, config.iterations, config.prf.into())?;
    debug!(
        scheme = ?config.scheme,
        iterations = config.iterations,
        "generated encryption parameters"
    );
    let encrypted =
        EncryptedPrivateKeyInfo::encrypt_with_password(&key, algorithm, password.as_bytes(), None)?;
    println!("{}", encrypted.to_pem()?);

    Ok(())
}

use std::str::FromStr;

use clap::Args;
use kagi_pem::ToPem;
use kagi_pkcs::pkcs8::EncryptedPrivateKeyInfo;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::utils::read_pem_input;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the PEM file. If not specified, reads from stdin
    pub(crate) file: Option<String>,

    /// Password the key was encrypted with
    #[arg(short, long, env = "KAGI_PASSWORD", hide_env_values = true)]
    pub(crate) password: String,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let password = Zeroizing::new(config.password);
    let contents = read_pem_input(config.file.as_deref())?;

    let encrypted = EncryptedPrivateKeyInfo::from_str(&contents)?;
    let key = encrypted.decrypt_with_password(password.as_bytes(), None)?;
    println!("{}", key.to_pem()?);

    Ok(())
}

pub(crate) mod decrypt;
pub(crate) mod encrypt;
pub(crate) mod inspect;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Pkcs8Commands {
    /// Inspect a PKCS#8 private key or encrypted private key
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
    /// Encrypt a PRIVATE KEY with a password
    Encrypt {
        #[command(flatten)]
        config: encrypt::Config,
    },
    /// Decrypt an ENCRYPTED PRIVATE KEY with a password
    Decrypt {
        #[command(flatten)]
        config: decrypt::Config,
    },
}

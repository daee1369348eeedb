use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod error;
mod output;
mod pkcs8;
mod utils;

use error::Result;

use pkcs8::Pkcs8Commands;

const DEFAULT_LOG_FILTER: &str = "kagi=debug,kagi_pkcs=debug";

#[derive(Parser)]
#[command(name = "kagi")]
#[command(about = "PKCS#8 encrypted private key toolkit", long_about = None)]
struct Cli {
    /// Log library events to stderr (filter with RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// PKCS#8 private key operations
    Pkcs8 {
        #[command(subcommand)]
        command: Pkcs8Commands,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        init_tracing();
    }

    match cli.command {
        Commands::Pkcs8 { command } => match command {
            Pkcs8Commands::Inspect { config } => {
                pkcs8::inspect::execute(config)?;
            }
            Pkcs8Commands::Encrypt { config } => {
                pkcs8::encrypt::execute(config)?;
            }
            Pkcs8Commands::Decrypt { config } => {
                pkcs8::decrypt::execute(config)?;
            }
        },
    }

    Ok(())
}

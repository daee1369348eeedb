use std::fs;
use std::io::{self, Read};

use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::debug;

use crate::error::{Error, Result};

/// Read input from a file or stdin
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    debug!(source = file.unwrap_or("<stdin>"), "reading input");
    match file {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Read PEM text from a file or stdin.
pub(crate) fn read_pem_input(file: Option<&str>) -> Result<String> {
    Ok(String::from_utf8(read_input(file)?)?)
}

/// Fill a fixed size buffer from the operating system RNG.
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::Random(e.to_string()))?;
    Ok(bytes)
}

/// Lowercase hex without separators.
pub(crate) fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

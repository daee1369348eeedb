use serde::Serialize;

use crate::error::Result;

#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Prints `value` as JSON or YAML, returning `false` for the text format
/// so the caller renders it instead.
pub(crate) fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(value)?),
        OutputFormat::Text => return Ok(false),
    }
    Ok(true)
}

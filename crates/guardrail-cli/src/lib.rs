//! # guardrail-cli — Guard Command-Line Interface
//!
//! Runs the guards from `guardrail-core` against JSON/YAML input so guard
//! behavior and alias configuration can be checked from scripts and CI.
//!
//! ## Subcommands
//!
//! - `aliases`: Print the effective alias table (and registered kinds)
//! - `check`: Run a type check over a `{type: values}` document
//! - `ensure`: Run `ensure` / `ensure_not` over two JSON values
//!
//! ## Exit Codes
//!
//! `0` when the guard passes, `1` when it fails (the error-info record is
//! printed as JSON), `2` on operational errors such as unreadable input or
//! an unconstructible error kind.

pub mod aliases;
pub mod check;
pub mod config;
pub mod ensure;

use std::path::Path;

use anyhow::{Context, Result};
use guardrail_core::{get_exception_info, ErrorInfoSource};

/// Read a YAML or JSON document, preserving mapping order.
pub fn load_document(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse YAML or JSON text.
pub fn parse_document(raw: &str) -> Result<serde_json::Value> {
    Ok(serde_yaml::from_str(raw)?)
}

/// Print the error-info record for a guard failure.
pub fn print_failure(error: &impl ErrorInfoSource) -> Result<()> {
    let info = get_exception_info(error);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

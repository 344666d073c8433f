//! Domain list input.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the domains to resolve from a file holding a JSON array of strings.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON string array.
pub fn load_domains(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let domains: Vec<String> = serde_json::from_slice(&content)
        .with_context(|| format!("Input file {} is not a JSON string array", path.display()))?;
    log::info!("Loaded {} domains from {}", domains.len(), path.display());
    Ok(domains)
}

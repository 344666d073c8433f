//! Result output.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::ResolutionResult;

/// Writes the final result to `path` as JSON.
///
/// `human_readable` selects indented output.
///
/// # Errors
///
/// Returns an error if the result cannot be serialized or the file written.
pub fn save_result(result: &ResolutionResult, path: &Path, human_readable: bool) -> Result<()> {
    let content = if human_readable {
        serde_json::to_vec_pretty(result)
    } else {
        serde_json::to_vec(result)
    }
    .context("Failed to serialize result")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Result saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DomainReport, MxReport};

    fn result() -> ResolutionResult {
        ResolutionResult {
            error: None,
            resolver_address: "(default)".to_string(),
            domains: vec![DomainReport {
                error: None,
                domain: "a.com".to_string(),
                mx_array: vec![MxReport {
                    error: None,
                    exchange: "mx.a.com.".to_string(),
                    exchange_ip: Some("192.0.2.1".to_string()),
                    preference: 10,
                }],
            }],
        }
    }

    #[test]
    fn test_compact_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_result(&result(), &path, false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('\n'));
        assert!(content.contains(r#""resolverAddress":"(default)""#));
        let parsed: ResolutionResult = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, result());
    }

    #[test]
    fn test_human_readable_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_result(&result(), &path, true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"domains\""));
        assert!(content.contains("\"exchangeIp\": \"192.0.2.1\""));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let error = save_result(&result(), &path, false).unwrap_err();
        assert!(error.to_string().contains("Failed to write"));
    }
}

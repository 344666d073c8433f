//! Run statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats};
use crate::models::ResolutionResult;

/// Prints the failure counters of a run to the log.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    if total_errors == 0 {
        return;
    }
    info!("Error Counts ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = error_stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}

/// Prints a one-line summary of a finished run.
pub fn print_summary(result: &ResolutionResult, elapsed_seconds: f64) {
    let total = result.domains.len();
    let failed = result.domains.iter().filter(|d| d.error.is_some()).count();
    let exchanges: usize = result.domains.iter().map(|d| d.mx_array.len()).sum();
    info!(
        "✅ Resolved {} domain{} ({} with errors, {} MX targets) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        failed,
        exchanges,
        elapsed_seconds
    );
    if let Some(error) = &result.error {
        log::warn!("Run did not complete normally: {error}");
    }
}

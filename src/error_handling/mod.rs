//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, lookup, run interruption)
//! - Failure categories and per-run counters
//!
//! Domain- and target-level failures are stored as data on the records they
//! belong to; only [`RunInterrupt`] ends a run early.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{ErrorType, InitializationError, LookupError, RunInterrupt};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        assert_eq!(stats.total_errors(), 0);
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::MxProtocolError);
        assert_eq!(stats.get_error_count(ErrorType::MxProtocolError), 1);
        assert_eq!(stats.get_error_count(ErrorType::MxLookupError), 0);
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::MxLookupError);
        stats.increment_error(ErrorType::AddressMissing);
        stats.increment_error(ErrorType::AddressMissing);
        assert_eq!(stats.get_error_count(ErrorType::AddressMissing), 2);
        assert_eq!(stats.total_errors(), 3);
    }

    #[test]
    fn test_processing_stats_concurrent_increments() {
        let stats = std::sync::Arc::new(ProcessingStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = std::sync::Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_error(ErrorType::Cancelled);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.get_error_count(ErrorType::Cancelled), 800);
    }
}

//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, default port, placeholder errors)
//! - Scan settings
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, Opt, Settings};

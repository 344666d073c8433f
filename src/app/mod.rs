//! Command-line application helpers.
//!
//! This module provides the pieces the `domain_mx` binary is built from:
//! domain input, result output, per-domain console reports, run statistics
//! and Ctrl-C handling.

pub mod input;
pub mod output;
pub mod report;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use input::load_domains;
pub use output::save_result;
pub use report::{format_domain, print_domain};
pub use shutdown::cancel_on_ctrl_c;
pub use statistics::{print_error_statistics, print_summary};

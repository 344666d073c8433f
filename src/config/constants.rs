//! Configuration constants.
//!
//! This module defines the constants used throughout the resolver, including
//! timeouts, the default resolver port and the placeholder error strings that
//! appear in result snapshots.

// Network operation timeouts
/// DNS query timeout in seconds
/// Each query gets exactly one attempt, so the timeout alone bounds how long a
/// slow name server can hold a domain back.
pub const DNS_TIMEOUT_SECS: u64 = 5;

/// Port used for a custom DNS resolver when only its address is given.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Label reported as the resolver address when the system configuration is used.
pub const DEFAULT_RESOLVER_LABEL: &str = "(default)";

/// Error reported for domains and MX targets whose query has not finished yet.
///
/// Every record starts with this error; a partial snapshot therefore shows
/// exactly which lookups are still outstanding.
pub const UNFINISHED_TASK: &str = "Unfinished task";

/// Error recorded on domains and targets whose lookup was aborted by cancellation.
pub const OPERATION_CANCELLED: &str = "The operation was cancelled";

/// Error recorded on an MX target whose address answer carried no address.
pub const NO_ADDRESS_FOUND: &str = "No IP addresses found";

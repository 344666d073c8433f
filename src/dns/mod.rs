//! DNS lookups.
//!
//! This module defines the DNS client capability the resolution pipeline
//! depends on, and its production implementation using `hickory-resolver`:
//! - Mail exchanger queries (MX records)
//! - Exchange address resolution (A/AAAA records)
//!
//! All operations are async; each call is a single query attempt.

mod client;
mod hickory;

// Re-export public API
pub use client::{AddressLookup, DnsClient, MxAnswer, MxLookup};
pub use hickory::HickoryDnsClient;

#[cfg(test)]
mod tests;

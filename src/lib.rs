//! domain_mx library: concurrent MX resolution of domain lists
//!
//! This library resolves the mail exchangers of many domains at once. Each
//! domain's MX records are queried, then the address of every exchange is
//! resolved, all concurrently. Completed domains are delivered to an optional
//! callback as they finish, and a snapshot of every domain is available at any
//! time.
//!
//! # Example
//!
//! ```no_run
//! use domain_mx::{MxScan, Settings};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let settings = Settings {
//!     process: false,
//!     dns_ip: Some("9.9.9.9".to_string()),
//!     sort: true,
//!     ..Default::default()
//! };
//!
//! let scan = MxScan::new(["example.com", "example.org"], None, settings);
//! let result = scan.process_async().await;
//! for domain in &result.domains {
//!     println!("{}: {} MX targets", domain.domain, domain.mx_array.len());
//! }
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Create scans from within
//! `#[tokio::main]` or another runtime context.

#![warn(missing_docs)]

mod aggregate;
pub mod app;
pub mod config;
pub mod dns;
mod error_handling;
pub mod initialization;
mod models;
mod pipeline;
mod registry;
mod scan;
mod stream;

// Re-export public API
pub use aggregate::{InterruptSignal, TaskAggregator};
pub use config::{LogFormat, LogLevel, Settings};
pub use dns::{AddressLookup, DnsClient, MxAnswer, MxLookup};
pub use error_handling::{ErrorType, InitializationError, LookupError, ProcessingStats, RunInterrupt};
pub use models::{DomainRecord, DomainReport, MxReport, MxTarget, ResolutionResult};
pub use registry::DomainRegistry;
pub use scan::{MxScan, RunState};
pub use stream::{DomainNotifier, ResultStream};

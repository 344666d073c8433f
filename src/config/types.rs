//! Configuration types and CLI options.
//!
//! This module defines the settings used to construct an [`MxScan`](crate::MxScan)
//! and the enums and structs used for command-line argument parsing.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_DNS_PORT, DEFAULT_RESOLVER_LABEL, DNS_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Settings used when constructing an [`MxScan`](crate::MxScan).
///
/// # Examples
///
/// ```
/// use domain_mx::Settings;
///
/// let settings = Settings {
///     sort: true,
///     dns_ip: Some("1.1.1.1".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(settings.resolver_address(), "1.1.1.1:53");
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// Start querying as soon as the scan is constructed
    pub process: bool,

    /// When starting immediately, return from the constructor without waiting
    pub run_async: bool,

    /// Order each domain's MX targets by ascending preference
    pub sort: bool,

    /// Custom DNS resolver address (system configuration when `None`)
    pub dns_ip: Option<String>,

    /// Custom DNS resolver port (53 when `None`)
    pub dns_port: Option<u16>,

    /// Upper bound on concurrently in-flight lookups (unbounded when `None`)
    pub max_concurrency: Option<usize>,

    /// Timeout applied to every single lookup
    pub lookup_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            process: true,
            run_async: false,
            sort: false,
            dns_ip: None,
            dns_port: None,
            max_concurrency: None,
            lookup_timeout: Duration::from_secs(DNS_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Address of the resolver used for the run, as reported in results.
    ///
    /// Returns `"(default)"` when the system configuration is used.
    pub fn resolver_address(&self) -> String {
        match &self.dns_ip {
            Some(ip) => {
                let port = self.dns_port.unwrap_or(DEFAULT_DNS_PORT);
                match ip.trim().parse::<IpAddr>() {
                    Ok(addr) => SocketAddr::new(addr, port).to_string(),
                    Err(_) => format!("{ip}:{port}"),
                }
            }
            None => DEFAULT_RESOLVER_LABEL.to_string(),
        }
    }

    /// Validates the custom resolver configuration.
    ///
    /// Returns `Ok(None)` when no custom resolver is configured.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::InvalidResolverAddress` if the address is not
    /// an IP address, or `InitializationError::InvalidResolverPort` for port 0.
    pub fn name_server(&self) -> Result<Option<SocketAddr>, InitializationError> {
        let Some(ip) = &self.dns_ip else {
            return Ok(None);
        };
        let addr = ip.trim().parse::<IpAddr>().map_err(|source| {
            InitializationError::InvalidResolverAddress {
                address: ip.clone(),
                source,
            }
        })?;
        let port = self.dns_port.unwrap_or(DEFAULT_DNS_PORT);
        if port == 0 {
            return Err(InitializationError::InvalidResolverPort(port));
        }
        Ok(Some(SocketAddr::new(addr, port)))
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Resolve two domains and print each one as it completes
/// domain_mx example.com example.org
///
/// # Read domains from a JSON array, use a custom resolver, save sorted results
/// domain_mx --input domains.json --dns-ip 9.9.9.9 --sort --output result.json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "domain_mx",
    about = "Resolves MX records and mail exchanger addresses for a list of domains."
)]
pub struct Opt {
    /// Domains to resolve (ignored when --input is given)
    #[arg(value_name = "DOMAINS")]
    pub domains: Vec<String>,

    /// File containing a JSON string array with the domains to resolve
    #[arg(long, value_parser)]
    pub input: Option<PathBuf>,

    /// File receiving the final result (JSON)
    #[arg(long, value_parser)]
    pub output: Option<PathBuf>,

    /// Store the --output file in indented, human readable form
    #[arg(long)]
    pub human_readable: bool,

    /// Do not print processed domains to standard output
    #[arg(long)]
    pub quiet: bool,

    /// Sort the MX records of each domain by preference
    #[arg(long)]
    pub sort: bool,

    /// Custom DNS resolver IP address
    #[arg(long)]
    pub dns_ip: Option<String>,

    /// Custom DNS resolver port
    #[arg(long)]
    pub dns_port: Option<u16>,

    /// Maximum number of concurrent DNS lookups (unbounded by default)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Builds scan settings from the command line.
    ///
    /// Processing is deferred; the CLI starts it explicitly once the
    /// cancellation handler is in place.
    pub fn settings(&self) -> Settings {
        Settings {
            process: false,
            run_async: true,
            sort: self.sort,
            dns_ip: self.dns_ip.clone(),
            dns_port: self.dns_port,
            max_concurrency: self.max_concurrency,
            ..Default::default()
        }
    }
}

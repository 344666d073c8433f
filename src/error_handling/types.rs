//! Error type definitions.
//!
//! This module defines the error types used throughout the resolver and the
//! categories used for run statistics.

use std::net::AddrParseError;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::OPERATION_CANCELLED;

/// Error types for initialization failures.
///
/// An invalid resolver configuration is fatal for a scan: no query is started
/// and the message becomes the top-level error of the result.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The custom resolver address is not an IP address.
    #[error("Invalid DNS resolver address '{address}': {source}")]
    InvalidResolverAddress {
        /// Address as configured
        address: String,
        /// Parse failure
        source: AddrParseError,
    },

    /// The custom resolver port cannot be used.
    #[error("Invalid DNS resolver port: {0}")]
    InvalidResolverPort(u16),
}

/// Failure of a single DNS lookup.
///
/// Negative DNS answers are not errors at this level; they are reported as
/// the lookup's protocol error instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Transport-level failure (timeout, I/O, unreachable server).
    ///
    /// Recorded on the domain or target it belongs to.
    #[error("{0}")]
    Transport(String),

    /// Failure the pipeline cannot account for.
    ///
    /// Recorded like a transport failure, then escalated so the whole run stops.
    #[error("{0}")]
    Unexpected(String),
}

/// Reason a run stopped before all of its operations succeeded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunInterrupt {
    /// The run was cancelled.
    #[error("{}", OPERATION_CANCELLED)]
    Cancelled,

    /// An operation failed unexpectedly.
    #[error("{0}")]
    Failed(String),
}

/// Categories of failures recorded during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// MX query failed in transport
    MxLookupError,
    /// MX query answered with an error response code
    MxProtocolError,
    /// MX answer held non-MX records
    MxAnswerMismatch,
    /// Address query failed in transport
    AddressLookupError,
    /// Address query answered with an error response code
    AddressProtocolError,
    /// Address query answered without an address
    AddressMissing,
    /// Lookup aborted by cancellation
    Cancelled,
    /// Lookup failed unexpectedly and stopped the run
    UnexpectedFailure,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Human-readable label used in statistics output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::MxLookupError => "MX lookup error",
            ErrorType::MxProtocolError => "MX response error",
            ErrorType::MxAnswerMismatch => "MX answer count mismatch",
            ErrorType::AddressLookupError => "Exchange address lookup error",
            ErrorType::AddressProtocolError => "Exchange address response error",
            ErrorType::AddressMissing => "Exchange without address",
            ErrorType::Cancelled => "Cancelled lookup",
            ErrorType::UnexpectedFailure => "Unexpected failure",
        }
    }
}

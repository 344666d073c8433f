//! The DNS client capability used by the resolution pipeline.

use async_trait::async_trait;

use crate::error_handling::LookupError;

/// One MX answer: exchange host name and preference (lower is preferred).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxAnswer {
    /// Exchange host name
    pub exchange: String,
    /// MX preference
    pub preference: u16,
}

impl MxAnswer {
    /// Creates an answer for `exchange` with `preference`.
    pub fn new(exchange: impl Into<String>, preference: u16) -> Self {
        Self {
            exchange: exchange.into(),
            preference,
        }
    }
}

/// Outcome of an MX query that reached a name server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MxLookup {
    /// MX-typed answers, in answer order
    pub targets: Vec<MxAnswer>,
    /// Error reported by the name server (NXDomain, ServFail, ...)
    pub protocol_error: Option<String>,
    /// Number of records in the answer section, whatever their type
    pub raw_answer_count: usize,
}

/// Outcome of an address query that reached a name server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressLookup {
    /// First address of the answer
    pub address: Option<String>,
    /// Error reported by the name server
    pub protocol_error: Option<String>,
}

/// Asynchronous DNS lookups needed to resolve a domain's mail exchangers.
///
/// Implementations perform a single attempt per call. Cancellation is applied
/// by the caller, which drops the returned future when the run is cancelled.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Queries the MX records of `name`.
    async fn lookup_mx(&self, name: &str) -> Result<MxLookup, LookupError>;

    /// Queries the address of the host `name`.
    async fn lookup_address(&self, name: &str) -> Result<AddressLookup, LookupError>;
}

//! `DnsClient` implementation over `hickory-resolver`.

use async_trait::async_trait;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

use super::client::{AddressLookup, DnsClient, MxAnswer, MxLookup};
use crate::error_handling::LookupError;

/// DNS client backed by a hickory `TokioAsyncResolver`.
pub struct HickoryDnsClient {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsClient {
    /// Wraps a configured resolver.
    pub fn new(resolver: TokioAsyncResolver) -> Self {
        Self { resolver }
    }
}

/// Splits a resolver failure into a name server answer and a transport failure.
///
/// A negative answer is a protocol error carrying the response code, except
/// `NoError`, which is an empty answer.
fn classify(error: ResolveError) -> Result<Option<String>, LookupError> {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NoError {
                Ok(None)
            } else {
                Ok(Some(response_code.to_string()))
            }
        }
        _ => Err(LookupError::Transport(error.to_string())),
    }
}

#[async_trait]
impl DnsClient for HickoryDnsClient {
    async fn lookup_mx(&self, name: &str) -> Result<MxLookup, LookupError> {
        // For MX lookups, use domain as-is (no trailing dot needed)
        match self.resolver.lookup(name, RecordType::MX).await {
            Ok(lookup) => {
                let targets = lookup
                    .iter()
                    .filter_map(|rdata| {
                        if let RData::MX(mx) = rdata {
                            Some(MxAnswer::new(mx.exchange().to_utf8(), mx.preference()))
                        } else {
                            None
                        }
                    })
                    .collect();
                Ok(MxLookup {
                    targets,
                    protocol_error: None,
                    raw_answer_count: lookup.records().len(),
                })
            }
            Err(e) => {
                let protocol_error = classify(e)?;
                Ok(MxLookup {
                    protocol_error,
                    ..Default::default()
                })
            }
        }
    }

    async fn lookup_address(&self, name: &str) -> Result<AddressLookup, LookupError> {
        match self.resolver.lookup_ip(name).await {
            Ok(response) => Ok(AddressLookup {
                address: response.iter().next().map(|ip| ip.to_string()),
                protocol_error: None,
            }),
            Err(e) => {
                let protocol_error = classify(e)?;
                Ok(AddressLookup {
                    address: None,
                    protocol_error,
                })
            }
        }
    }
}

//! Stage 2: address lookup of one MX exchange.

use std::sync::Arc;

use super::{Attempt, Pipeline};
use crate::config::{NO_ADDRESS_FOUND, OPERATION_CANCELLED};
use crate::dns::AddressLookup;
use crate::error_handling::{ErrorType, LookupError, RunInterrupt};
use crate::models::{DomainRecord, TargetOutcome};

/// Handle from an address lookup task to its target: the owning record and
/// the target's index in it.
pub(crate) struct ExchangeHandle {
    pub(crate) record: Arc<DomainRecord>,
    pub(crate) index: usize,
}

fn failed(error: String) -> TargetOutcome {
    TargetOutcome {
        address: None,
        error: Some(error),
    }
}

impl Pipeline {
    /// Resolves the address of one target and counts it as done.
    ///
    /// Bookkeeping runs on every path, cancellation included, so the owning
    /// record is always pushed exactly once.
    pub(crate) async fn resolve_exchange(
        self: Arc<Self>,
        handle: ExchangeHandle,
    ) -> Result<(), RunInterrupt> {
        let ExchangeHandle { record, index } = handle;
        let Some(target) = record.targets().get(index) else {
            return Err(RunInterrupt::Failed(format!(
                "MX target {index} of {} does not exist",
                record.domain()
            )));
        };
        let exchange = target.exchange().to_string();
        log::debug!("Resolving exchange {exchange} of {}", record.domain());

        let (outcome, result) = match self.attempt(self.client.lookup_address(&exchange)).await {
            Attempt::Done(AddressLookup {
                protocol_error: Some(error),
                ..
            }) => {
                self.stats.increment_error(ErrorType::AddressProtocolError);
                (failed(error), Ok(()))
            }
            Attempt::Done(AddressLookup {
                address: Some(address),
                ..
            }) => (
                TargetOutcome {
                    address: Some(address),
                    error: None,
                },
                Ok(()),
            ),
            Attempt::Done(_) => {
                self.stats.increment_error(ErrorType::AddressMissing);
                (failed(NO_ADDRESS_FOUND.to_string()), Ok(()))
            }
            Attempt::Failed(LookupError::Transport(message)) => {
                log::debug!("Address lookup failed for {exchange}: {message}");
                self.stats.increment_error(ErrorType::AddressLookupError);
                (failed(message), Ok(()))
            }
            Attempt::Failed(LookupError::Unexpected(message)) => {
                self.stats.increment_error(ErrorType::UnexpectedFailure);
                (failed(message.clone()), Err(RunInterrupt::Failed(message)))
            }
            Attempt::Cancelled => {
                self.stats.increment_error(ErrorType::Cancelled);
                (
                    failed(OPERATION_CANCELLED.to_string()),
                    Err(RunInterrupt::Cancelled),
                )
            }
        };

        target.resolve(outcome);
        if record.complete_target() {
            self.push(&record);
        }
        result
    }
}

//! Stage 1: MX lookup of a domain.

use std::sync::Arc;

use super::{Attempt, ExchangeHandle, Pipeline};
use crate::config::OPERATION_CANCELLED;
use crate::error_handling::{ErrorType, LookupError, RunInterrupt};
use crate::models::{DomainRecord, MxTarget, TargetOutcome};

/// Advisory recorded when the answer holds records other than MX.
fn mismatch_message(mx_count: usize, answer_count: usize) -> String {
    format!(
        "Bad number ({mx_count}/{answer_count}) of received MX records. Probably redirects occurred."
    )
}

impl Pipeline {
    /// Queries the MX records of `record` and starts one address lookup per target.
    ///
    /// The record is pushed to the result stream here only when it ends up
    /// with no targets; otherwise the last address lookup pushes it.
    pub(crate) async fn resolve_domain(
        self: Arc<Self>,
        record: Arc<DomainRecord>,
    ) -> Result<(), RunInterrupt> {
        let domain = record.domain().to_string();
        log::debug!("Querying MX records for {domain}");

        let lookup = match self.attempt(self.client.lookup_mx(&domain)).await {
            Attempt::Done(lookup) => lookup,
            Attempt::Cancelled => {
                self.stats.increment_error(ErrorType::Cancelled);
                self.finish_without_targets(&record, OPERATION_CANCELLED.to_string());
                return Err(RunInterrupt::Cancelled);
            }
            Attempt::Failed(LookupError::Transport(message)) => {
                log::debug!("MX lookup failed for {domain}: {message}");
                self.stats.increment_error(ErrorType::MxLookupError);
                self.finish_without_targets(&record, message);
                return Ok(());
            }
            Attempt::Failed(LookupError::Unexpected(message)) => {
                self.stats.increment_error(ErrorType::UnexpectedFailure);
                self.finish_without_targets(&record, message.clone());
                return Err(RunInterrupt::Failed(message));
            }
        };

        let mut error = lookup.protocol_error;
        let mut answers = Vec::new();
        if error.is_some() {
            self.stats.increment_error(ErrorType::MxProtocolError);
        } else {
            answers = lookup.targets;
            if answers.len() != lookup.raw_answer_count {
                self.stats.increment_error(ErrorType::MxAnswerMismatch);
                error = Some(mismatch_message(answers.len(), lookup.raw_answer_count));
            }
        }
        if self.sort {
            // Stable: equal preferences keep answer order
            answers.sort_by_key(|answer| answer.preference);
        }

        let targets: Vec<MxTarget> = answers
            .into_iter()
            .map(|answer| MxTarget::new(answer.exchange, answer.preference))
            .collect();
        let count = targets.len();
        log::debug!("{domain}: {count} MX targets");

        record.set_error(error);
        record.set_targets(targets);
        record.finish_mx();

        if count == 0 {
            self.push(&record);
            return Ok(());
        }

        if self.cancel.is_cancelled() {
            // Keep the answer, but do not start any address lookup
            self.stats.increment_error(ErrorType::Cancelled);
            for target in record.targets() {
                target.resolve(TargetOutcome {
                    address: None,
                    error: Some(OPERATION_CANCELLED.to_string()),
                });
                if record.complete_target() {
                    self.push(&record);
                }
            }
            return Err(RunInterrupt::Cancelled);
        }

        for index in 0..count {
            let handle = ExchangeHandle {
                record: Arc::clone(&record),
                index,
            };
            self.exchanges
                .spawn(Arc::clone(&self).resolve_exchange(handle));
        }
        Ok(())
    }

    /// Completes a record whose MX stage ended before any target was known.
    fn finish_without_targets(&self, record: &Arc<DomainRecord>, error: String) {
        record.set_error(Some(error));
        record.finish_mx();
        self.push(record);
    }
}

//! Two-stage resolution pipeline.
//!
//! Stage 1 ([`Pipeline::resolve_domain`]) queries a domain's MX records and
//! fans out one stage-2 task per target. Stage 2
//! ([`Pipeline::resolve_exchange`]) resolves the exchange's address and counts
//! the target as done; whichever target completes the count hands the domain
//! to the result stream.

mod domain;
mod exchange;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::aggregate::{panic_message, TaskAggregator};
use crate::dns::DnsClient;
use crate::error_handling::{LookupError, ProcessingStats};
use crate::models::DomainRecord;
use crate::stream::ResultStream;

pub(crate) use exchange::ExchangeHandle;

/// Outcome of one lookup raced against cancellation.
enum Attempt<T> {
    Done(T),
    Failed(LookupError),
    Cancelled,
}

/// State shared by every lookup task of a run.
pub(crate) struct Pipeline {
    pub(crate) client: Arc<dyn DnsClient>,
    pub(crate) cancel: CancellationToken,
    pub(crate) exchanges: Arc<TaskAggregator>,
    pub(crate) stream: Option<Arc<ResultStream>>,
    pub(crate) limiter: Option<Arc<Semaphore>>,
    pub(crate) stats: Arc<ProcessingStats>,
    pub(crate) sort: bool,
}

impl Pipeline {
    /// Runs `lookup` unless the run is cancelled first.
    ///
    /// Waits for a limiter permit when concurrency is bounded. A panicking
    /// lookup is reported as an unexpected failure.
    async fn attempt<T, F>(&self, lookup: F) -> Attempt<T>
    where
        F: Future<Output = Result<T, LookupError>>,
    {
        let _permit = match &self.limiter {
            Some(limiter) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Attempt::Cancelled,
                permit = Arc::clone(limiter).acquire_owned() => match permit {
                    Ok(permit) => Some(permit),
                    Err(_) => return Attempt::Cancelled,
                },
            },
            None => None,
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Attempt::Cancelled,
            result = AssertUnwindSafe(lookup).catch_unwind() => match result {
                Ok(Ok(answer)) => Attempt::Done(answer),
                Ok(Err(error)) => Attempt::Failed(error),
                Err(panic) => Attempt::Failed(LookupError::Unexpected(panic_message(&*panic))),
            },
        }
    }

    /// Hands a completed record to the result stream, if there is one.
    fn push(&self, record: &Arc<DomainRecord>) {
        log::debug!("Completed {}", record.domain());
        if let Some(stream) = &self.stream {
            stream.push(Arc::clone(record));
        }
    }
}

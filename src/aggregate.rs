//! First-failure aggregation over a growing set of tasks.
//!
//! A [`TaskAggregator`] spawns operations and resolves once every operation
//! spawned into it has succeeded, or as soon as any operation of the run
//! fails or observes cancellation. Operations may keep being spawned while
//! another task is already waiting on the aggregate.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error_handling::RunInterrupt;

/// Run-wide slot holding the first interruption.
///
/// Raising the signal also cancels the run, so every outstanding lookup
/// aborts once the first failure is known.
#[derive(Debug)]
pub struct InterruptSignal {
    first: OnceLock<RunInterrupt>,
    raised: CancellationToken,
    run: CancellationToken,
}

impl InterruptSignal {
    /// Creates a signal that cancels `run` when raised.
    pub fn new(run: CancellationToken) -> Self {
        Self {
            first: OnceLock::new(),
            raised: CancellationToken::new(),
            run,
        }
    }

    /// Records `interrupt` unless an earlier one was recorded.
    ///
    /// Returns `true` if this interrupt is the one retained.
    pub fn raise(&self, interrupt: RunInterrupt) -> bool {
        let first = self.first.set(interrupt).is_ok();
        self.raised.cancel();
        self.run.cancel();
        first
    }

    /// The retained interrupt, if any.
    pub fn get(&self) -> Option<&RunInterrupt> {
        self.first.get()
    }

    /// Completes once an interrupt has been recorded.
    pub async fn raised(&self) {
        self.raised.cancelled().await
    }
}

/// Extracts the message of a caught panic.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    }
}

/// Set of concurrently running operations watched for their first failure.
#[derive(Debug)]
pub struct TaskAggregator {
    name: &'static str,
    tracker: TaskTracker,
    signal: Arc<InterruptSignal>,
}

impl TaskAggregator {
    /// Creates an empty set reporting to `signal`; `name` is used in logs.
    pub fn new(name: &'static str, signal: Arc<InterruptSignal>) -> Self {
        Self {
            name,
            tracker: TaskTracker::new(),
            signal,
        }
    }

    /// Spawns `operation` into the watched set.
    ///
    /// An `Err` result, or a panic, raises the shared interrupt signal.
    pub fn spawn<F>(&self, operation: F)
    where
        F: Future<Output = Result<(), RunInterrupt>> + Send + 'static,
    {
        let signal = Arc::clone(&self.signal);
        let name = self.name;
        self.tracker.spawn(async move {
            let outcome = AssertUnwindSafe(operation)
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(RunInterrupt::Failed(panic_message(&*panic))));
            if let Err(interrupt) = outcome {
                if signal.raise(interrupt.clone()) {
                    match interrupt {
                        RunInterrupt::Cancelled => log::info!("{name} cancelled"),
                        RunInterrupt::Failed(message) => {
                            log::warn!("{name} failed, stopping the run: {message}")
                        }
                    }
                }
            }
        });
    }

    /// Number of operations still running.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    /// Whether no operation is running.
    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Waits until every operation succeeded or the run was interrupted.
    ///
    /// Operations spawned while waiting are included as long as they are
    /// spawned before the set drains.
    pub async fn wait(&self) -> Result<(), RunInterrupt> {
        self.tracker.close();
        tokio::select! {
            _ = self.tracker.wait() => {}
            _ = self.signal.raised() => {}
        }
        match self.signal.get() {
            Some(interrupt) => Err(interrupt.clone()),
            None => Ok(()),
        }
    }

    /// Waits until every operation has finished, whatever its outcome.
    pub async fn settle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

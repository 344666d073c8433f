//! Delivery of completed domains to the notification callback.
//!
//! Lookup tasks push finished records into an unbounded channel; a single
//! consumer on a blocking thread drains it and calls the user's callback, so a
//! slow or panicking callback never holds up a lookup.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

use crate::aggregate::panic_message;
use crate::models::DomainRecord;

/// Callback invoked once per completed domain, on the consumer thread.
pub type DomainNotifier = Box<dyn FnMut(&DomainRecord) + Send>;

/// Producer side of the result stream.
#[derive(Debug)]
pub struct ResultStream {
    sender: RwLock<Option<UnboundedSender<Arc<DomainRecord>>>>,
}

impl ResultStream {
    /// Creates the stream and spawns its consumer.
    ///
    /// The returned handle completes once the stream is closed and every
    /// pushed record has been delivered.
    pub fn start(mut notifier: DomainNotifier) -> (Self, JoinHandle<usize>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Arc<DomainRecord>>();
        let consumer = tokio::task::spawn_blocking(move || {
            let mut delivered = 0usize;
            while let Some(record) = receiver.blocking_recv() {
                delivered += 1;
                if let Err(panic) = catch_unwind(AssertUnwindSafe(|| notifier(&record))) {
                    log::warn!(
                        "Notification callback panicked for {}: {}",
                        record.domain(),
                        panic_message(&*panic)
                    );
                }
            }
            log::debug!("Result stream drained after {delivered} domains");
            delivered
        });
        let stream = Self {
            sender: RwLock::new(Some(sender)),
        };
        (stream, consumer)
    }

    /// Enqueues a completed record; never blocks.
    pub fn push(&self, record: Arc<DomainRecord>) {
        let sender = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => {
                if sender.send(record).is_err() {
                    log::warn!("Result stream consumer is gone, dropping record");
                }
            }
            None => log::warn!("Record {} pushed after the stream closed", record.domain()),
        }
    }

    /// Closes the stream for writing; the consumer stops once drained.
    pub fn close(&self) {
        self.sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

//! Resolution records and result snapshots.
//!
//! [`DomainRecord`] and [`MxTarget`] are the live records filled in by the
//! pipeline. [`ResolutionResult`], [`DomainReport`] and [`MxReport`] are plain
//! serialisable copies taken from them at a point in time.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};

use crate::config::UNFINISHED_TASK;

/// Resolution state of one unique (lowercased) domain name.
///
/// Owned by the registry; the pipeline mutates it through shared references.
/// Once a record has been handed to the notification callback it is never
/// modified again.
#[derive(Debug)]
pub struct DomainRecord {
    domain: String,
    position: usize,
    error: Mutex<Option<String>>,
    targets: OnceLock<Vec<MxTarget>>,
    target_count: AtomicUsize,
    completed: AtomicUsize,
    mx_done: AtomicBool,
}

impl DomainRecord {
    pub(crate) fn new(domain: String, position: usize) -> Self {
        Self {
            domain,
            position,
            error: Mutex::new(Some(UNFINISHED_TASK.to_string())),
            targets: OnceLock::new(),
            target_count: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            mx_done: AtomicBool::new(false),
        }
    }

    /// Normalized domain name.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Order in which the domain was first submitted.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Current error of the domain, if any.
    pub fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last writer wins.
    pub(crate) fn set_error(&self, error: Option<String>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }

    /// MX targets, empty until the MX query has produced them.
    pub fn targets(&self) -> &[MxTarget] {
        self.targets.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Publishes the target list.
    ///
    /// The count is stored before the list so that any address lookup started
    /// for these targets compares against the final count.
    pub(crate) fn set_targets(&self, targets: Vec<MxTarget>) {
        self.target_count.store(targets.len(), Ordering::SeqCst);
        if self.targets.set(targets).is_err() {
            log::error!("MX targets of {} were published twice", self.domain);
        }
    }

    /// Number of MX targets.
    pub fn target_count(&self) -> usize {
        self.target_count.load(Ordering::SeqCst)
    }

    /// Number of targets whose address lookup has finished.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Counts one finished address lookup.
    ///
    /// Returns `true` for exactly one caller: the one whose increment brings the
    /// completed count to the target count.
    pub(crate) fn complete_target(&self) -> bool {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        done == self.target_count.load(Ordering::SeqCst)
    }

    /// Marks the MX stage as finished.
    pub(crate) fn finish_mx(&self) {
        self.mx_done.store(true, Ordering::SeqCst);
    }

    /// Whether the domain is fully resolved.
    pub fn is_complete(&self) -> bool {
        self.mx_done.load(Ordering::SeqCst) && self.completed_count() >= self.target_count()
    }

    /// Plain copy of the record's current state.
    pub fn report(&self) -> DomainReport {
        DomainReport {
            error: self.error(),
            domain: self.domain.clone(),
            mx_array: self.targets().iter().map(MxTarget::report).collect(),
        }
    }
}

/// Outcome of an exchange's address lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TargetOutcome {
    pub(crate) address: Option<String>,
    pub(crate) error: Option<String>,
}

/// One MX record of a domain.
///
/// The owning [`DomainRecord`] is reached through the handle held by the
/// address lookup task, never through the target itself.
#[derive(Debug)]
pub struct MxTarget {
    exchange: String,
    preference: u16,
    outcome: OnceLock<TargetOutcome>,
}

impl MxTarget {
    pub(crate) fn new(exchange: String, preference: u16) -> Self {
        Self {
            exchange,
            preference,
            outcome: OnceLock::new(),
        }
    }

    /// Exchange host name.
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// MX preference (lower is preferred).
    pub fn preference(&self) -> u16 {
        self.preference
    }

    /// Resolved address of the exchange.
    pub fn exchange_ip(&self) -> Option<&str> {
        self.outcome.get().and_then(|o| o.address.as_deref())
    }

    /// Error of the address lookup, or the unfinished marker while it runs.
    pub fn error(&self) -> Option<&str> {
        match self.outcome.get() {
            Some(outcome) => outcome.error.as_deref(),
            None => Some(UNFINISHED_TASK),
        }
    }

    /// Records the address lookup outcome; only the first call has an effect.
    pub(crate) fn resolve(&self, outcome: TargetOutcome) {
        if self.outcome.set(outcome).is_err() {
            log::error!("Address of {} was resolved twice", self.exchange);
        }
    }

    /// Plain copy of the target's current state.
    pub fn report(&self) -> MxReport {
        MxReport {
            error: self.error().map(str::to_string),
            exchange: self.exchange.clone(),
            exchange_ip: self.exchange_ip().map(str::to_string),
            preference: self.preference,
        }
    }
}

/// Snapshot of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// Set when the run failed as a whole (bad configuration, fatal failure, cancellation)
    pub error: Option<String>,
    /// Resolver used for the run, `(default)` for the system configuration
    pub resolver_address: String,
    /// Every registered domain, in submission order
    pub domains: Vec<DomainReport>,
}

/// Snapshot of one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainReport {
    /// MX query error or advisory, `Unfinished task` while the query runs
    pub error: Option<String>,
    /// Normalized domain name
    pub domain: String,
    /// MX targets, in answer order or by preference when sorted
    pub mx_array: Vec<MxReport>,
}

/// Snapshot of one MX target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxReport {
    /// Address lookup error, `Unfinished task` while the lookup runs
    pub error: Option<String>,
    /// Exchange host name
    pub exchange: String,
    /// Resolved exchange address
    pub exchange_ip: Option<String>,
    /// MX preference
    pub preference: u16,
}

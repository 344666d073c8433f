//! Deduplicating store of domain records.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::models::DomainRecord;

/// Concurrent map from normalized domain name to its record.
///
/// Names are lowercased before lookup, so `Example.COM` and `example.com`
/// share one record. Insertion is atomic per name: concurrent callers always
/// observe the same record instance. Records are never removed.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    records: DashMap<String, Arc<DomainRecord>>,
    next_position: AtomicUsize,
}

impl DomainRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a domain name for deduplication: lowercase, nothing else.
    pub fn normalize(name: &str) -> String {
        name.to_lowercase()
    }

    /// Returns the record for `name`, creating it on first use.
    pub fn get_or_create(&self, name: &str) -> Arc<DomainRecord> {
        let key = Self::normalize(name);
        self.records
            .entry(key.clone())
            .or_insert_with(|| {
                let position = self.next_position.fetch_add(1, Ordering::SeqCst);
                Arc::new(DomainRecord::new(key, position))
            })
            .value()
            .clone()
    }

    /// Registers every name and returns the number of unique domains.
    pub fn extend<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.get_or_create(name.as_ref());
        }
        self.len()
    }

    /// All records, in first-submission order.
    pub fn records(&self) -> Vec<Arc<DomainRecord>> {
        let mut records: Vec<_> = self.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by_key(|r| r.position());
        records
    }

    /// Number of unique domains.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no domain is registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// Shared test helpers: an in-memory DNS client and scan builders.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use domain_mx::{
    AddressLookup, DnsClient, DomainNotifier, DomainRecord, LookupError, MxAnswer, MxLookup,
    Settings,
};

/// Scripted behaviour of one name.
#[derive(Clone)]
#[allow(dead_code)] // Not every test file uses every variant
pub enum Reply<T> {
    Answer(T),
    Fail(LookupError),
    Panic(&'static str),
    /// Never answers; only cancellation ends the lookup
    Hang,
}

/// In-memory DNS client with per-name replies and latencies.
///
/// Unknown MX names answer with no targets; unknown exchanges resolve to
/// `192.0.2.1`.
#[derive(Default)]
pub struct MockDnsClient {
    mx: HashMap<String, (Duration, Reply<MxLookup>)>,
    addresses: HashMap<String, (Duration, Reply<AddressLookup>)>,
    pub mx_calls: AtomicUsize,
    pub address_calls: AtomicUsize,
    pub queried: Mutex<Vec<String>>,
}

#[allow(dead_code)] // Used by other test files
impl MockDnsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// MX answer of `name`, one target per `(exchange, preference)`.
    pub fn with_mx(mut self, name: &str, delay_ms: u64, targets: &[(&str, u16)]) -> Self {
        let targets: Vec<MxAnswer> = targets
            .iter()
            .map(|(exchange, preference)| MxAnswer::new(*exchange, *preference))
            .collect();
        let raw_answer_count = targets.len();
        self.mx.insert(
            name.to_string(),
            (
                Duration::from_millis(delay_ms),
                Reply::Answer(MxLookup {
                    targets,
                    protocol_error: None,
                    raw_answer_count,
                }),
            ),
        );
        self
    }

    pub fn with_mx_reply(mut self, name: &str, delay_ms: u64, reply: Reply<MxLookup>) -> Self {
        self.mx
            .insert(name.to_string(), (Duration::from_millis(delay_ms), reply));
        self
    }

    pub fn with_address(mut self, name: &str, delay_ms: u64, address: &str) -> Self {
        let reply = Reply::Answer(AddressLookup {
            address: Some(address.to_string()),
            protocol_error: None,
        });
        self.addresses
            .insert(name.to_string(), (Duration::from_millis(delay_ms), reply));
        self
    }

    pub fn with_address_reply(
        mut self,
        name: &str,
        delay_ms: u64,
        reply: Reply<AddressLookup>,
    ) -> Self {
        self.addresses
            .insert(name.to_string(), (Duration::from_millis(delay_ms), reply));
        self
    }

    pub fn mx_calls(&self) -> usize {
        self.mx_calls.load(Ordering::SeqCst)
    }

    pub fn address_calls(&self) -> usize {
        self.address_calls.load(Ordering::SeqCst)
    }

    async fn reply<T>(&self, name: &str, scripted: Option<(Duration, Reply<T>)>, default: T) -> Result<T, LookupError> {
        self.queried.lock().unwrap().push(name.to_string());
        let (delay, reply) = scripted.unwrap_or((Duration::ZERO, Reply::Answer(default)));
        tokio::time::sleep(delay).await;
        match reply {
            Reply::Answer(answer) => Ok(answer),
            Reply::Fail(error) => Err(error),
            Reply::Panic(message) => panic!("{message}"),
            Reply::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl DnsClient for MockDnsClient {
    async fn lookup_mx(&self, name: &str) -> Result<MxLookup, LookupError> {
        self.mx_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.mx.get(name).cloned();
        self.reply(name, scripted, MxLookup::default()).await
    }

    async fn lookup_address(&self, name: &str) -> Result<AddressLookup, LookupError> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.addresses.get(name).cloned();
        let default = AddressLookup {
            address: Some("192.0.2.1".to_string()),
            protocol_error: None,
        };
        self.reply(name, scripted, default).await
    }
}

/// Settings for a scan that is started explicitly by the test.
#[allow(dead_code)] // Used by other test files
pub fn deferred_settings() -> Settings {
    Settings {
        process: false,
        ..Default::default()
    }
}

/// Notifier collecting `(domain, completed targets)` of every delivered record.
#[allow(dead_code)] // Used by other test files
pub fn collecting_notifier() -> (DomainNotifier, Arc<Mutex<Vec<(String, usize)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let notifier: DomainNotifier = Box::new(move |record: &DomainRecord| {
        sink.lock()
            .unwrap()
            .push((record.domain().to_string(), record.completed_count()));
    });
    (notifier, seen)
}

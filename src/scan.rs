//! Scan orchestration.
//!
//! [`MxScan`] owns one run: it registers the domains, drives both pipeline
//! stages through their aggregators, closes the result stream once every
//! lookup has finished and exposes the result snapshot at any time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::aggregate::{InterruptSignal, TaskAggregator};
use crate::config::{Settings, UNFINISHED_TASK};
use crate::dns::DnsClient;
use crate::error_handling::{InitializationError, ProcessingStats};
use crate::initialization::{init_resolver, init_semaphore};
use crate::models::{DomainRecord, ResolutionResult};
use crate::pipeline::Pipeline;
use crate::registry::DomainRegistry;
use crate::stream::{DomainNotifier, ResultStream};

/// Lifecycle of a run.
///
/// `Configuring → Running → (Cancelling) → Draining → Done`. `Done` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Domains are registered, no lookup has started
    Configuring,
    /// Lookups are in flight
    Running,
    /// The run was cancelled or failed; outstanding lookups are aborting
    Cancelling,
    /// Every lookup has finished; the result stream is draining
    Draining,
    /// The run is over and the snapshot is final
    Done,
}

struct ScanInner {
    settings: Settings,
    registry: DomainRegistry,
    /// `None` when the configuration was rejected
    pipeline: Option<Arc<Pipeline>>,
    cancel: CancellationToken,
    domains: TaskAggregator,
    consumer: Mutex<Option<JoinHandle<usize>>>,
    stats: Arc<ProcessingStats>,
    error: OnceLock<String>,
    state: watch::Sender<RunState>,
    started: AtomicBool,
    handle: Handle,
}

/// Concurrent MX resolution of a set of domains.
///
/// Cloning an `MxScan` yields another handle to the same run, so one clone can
/// [`cancel`](MxScan::cancel) while another awaits
/// [`process_async`](MxScan::process_async).
///
/// Must be created within a Tokio runtime.
///
/// # Examples
///
/// ```no_run
/// use domain_mx::{MxScan, Settings};
///
/// # #[tokio::main]
/// # async fn main() {
/// let settings = Settings {
///     process: false,
///     sort: true,
///     ..Default::default()
/// };
/// let notifier: domain_mx::DomainNotifier = Box::new(|record: &domain_mx::DomainRecord| {
///     println!("done: {}", record.domain());
/// });
/// let scan = MxScan::new(["example.com", "Example.org"], Some(notifier), settings);
/// let result = scan.process_async().await;
/// println!("{}", serde_json::to_string_pretty(&result).unwrap());
/// # }
/// ```
#[derive(Clone)]
pub struct MxScan {
    inner: Arc<ScanInner>,
}

impl MxScan {
    /// Creates a scan backed by the hickory resolver built from `settings`.
    ///
    /// An invalid resolver configuration does not fail construction: the
    /// scan registers nothing and its snapshot carries the configuration error.
    ///
    /// With `settings.process` set the run starts right away; unless
    /// `settings.run_async` is also set, this call returns once it is done.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new<I, S>(domains: I, notifier: Option<DomainNotifier>, settings: Settings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match init_resolver(&settings) {
            Ok(client) => Self::with_client(domains, notifier, settings, client),
            Err(e) => Self::misconfigured(settings, e),
        }
    }

    /// Creates a scan that queries through `client`.
    ///
    /// The resolver fields of `settings` are still validated and reported in
    /// the snapshot.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn with_client<I, S>(
        domains: I,
        notifier: Option<DomainNotifier>,
        settings: Settings,
        client: Arc<dyn DnsClient>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Err(e) = settings.name_server() {
            return Self::misconfigured(settings, e);
        }

        let registry = DomainRegistry::new();
        let count = registry.extend(domains);
        log::info!(
            "Registered {count} unique domains, resolver {}",
            settings.resolver_address()
        );

        let cancel = CancellationToken::new();
        let signal = Arc::new(InterruptSignal::new(cancel.clone()));
        let stats = Arc::new(ProcessingStats::new());
        let (stream, consumer) = match notifier {
            Some(notifier) => {
                let (stream, consumer) = ResultStream::start(notifier);
                (Some(Arc::new(stream)), Some(consumer))
            }
            None => (None, None),
        };
        let pipeline = Pipeline {
            client,
            cancel: cancel.clone(),
            exchanges: Arc::new(TaskAggregator::new("exchange lookups", Arc::clone(&signal))),
            stream,
            limiter: settings.max_concurrency.map(init_semaphore),
            stats: Arc::clone(&stats),
            sort: settings.sort,
        };

        let scan = Self::from_inner(ScanInner {
            registry,
            pipeline: Some(Arc::new(pipeline)),
            cancel,
            domains: TaskAggregator::new("domain lookups", signal),
            consumer: Mutex::new(consumer),
            stats,
            error: OnceLock::new(),
            state: watch::Sender::new(RunState::Configuring),
            started: AtomicBool::new(false),
            handle: Handle::current(),
            settings,
        });

        if scan.inner.settings.process {
            if scan.inner.settings.run_async {
                scan.start();
            } else {
                scan.process();
            }
        }
        scan
    }

    fn misconfigured(settings: Settings, error: InitializationError) -> Self {
        log::error!("Invalid resolver configuration: {error}");
        let cancel = CancellationToken::new();
        let signal = Arc::new(InterruptSignal::new(cancel.clone()));
        let scan = Self::from_inner(ScanInner {
            settings,
            registry: DomainRegistry::new(),
            pipeline: None,
            cancel,
            domains: TaskAggregator::new("domain lookups", signal),
            consumer: Mutex::new(None),
            stats: Arc::new(ProcessingStats::new()),
            error: OnceLock::new(),
            state: watch::Sender::new(RunState::Done),
            started: AtomicBool::new(true),
            handle: Handle::current(),
        });
        let _ = scan.inner.error.set(error.to_string());
        scan
    }

    fn from_inner(inner: ScanInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Starts the run in the background unless it was already started.
    pub fn start(&self) {
        if self
            .inner
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.inner.handle.spawn(Arc::clone(&self.inner).run());
        }
    }

    /// Runs the scan to completion and returns the final snapshot.
    ///
    /// Blocks the calling thread. Inside a multi-threaded runtime the worker
    /// is handed over with `block_in_place`. A current-thread runtime cannot
    /// make progress while blocked, so the run is driven by a helper thread
    /// with its own runtime instead.
    pub fn process(&self) -> ResolutionResult {
        match Handle::try_current().map(|h| h.runtime_flavor()) {
            Ok(RuntimeFlavor::CurrentThread) => self.process_on_helper_thread(),
            Ok(_) => tokio::task::block_in_place(|| self.inner.handle.block_on(self.process_async())),
            Err(_) => self.inner.handle.block_on(self.process_async()),
        }
    }

    fn process_on_helper_thread(&self) -> ResolutionResult {
        if self
            .inner
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            let mut snapshot = self.snapshot();
            if self.state() != RunState::Done {
                // The run task lives on the runtime this thread is blocking
                log::error!("process() cannot wait for a run started on a current-thread runtime, use process_async()");
                snapshot
                    .error
                    .get_or_insert_with(|| UNFINISHED_TASK.to_string());
            }
            return snapshot;
        }

        let inner = Arc::clone(&self.inner);
        let outcome = std::thread::scope(|scope| {
            scope
                .spawn(move || -> std::io::Result<()> {
                    let runtime = tokio::runtime::Builder::new_multi_thread()
                        .enable_all()
                        .build()?;
                    runtime.block_on(inner.run());
                    Ok(())
                })
                .join()
        });
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.inner.abandon(format!("Failed to start lookup runtime: {e}")),
            Err(_) => self.inner.abandon("Lookup runtime panicked".to_string()),
        }
        self.snapshot()
    }

    /// Runs the scan to completion and returns the final snapshot.
    ///
    /// Calling it again after the run is done returns the same snapshot.
    pub async fn process_async(&self) -> ResolutionResult {
        self.start();
        let mut state = self.inner.state.subscribe();
        if state.wait_for(|s| *s == RunState::Done).await.is_err() {
            log::warn!("Run state channel closed before the run finished");
        }
        self.snapshot()
    }

    /// Cancels the run.
    ///
    /// Outstanding lookups abort; domains already resolved keep their result.
    pub fn cancel(&self) {
        if self.inner.pipeline.is_none() {
            return;
        }
        log::info!("Cancelling run");
        self.inner.cancel.cancel();
        self.inner.enter_cancelling();
    }

    /// Current state of every registered domain, complete or not.
    pub fn snapshot(&self) -> ResolutionResult {
        ResolutionResult {
            error: self.inner.error.get().cloned(),
            resolver_address: self.inner.settings.resolver_address(),
            domains: self
                .inner
                .registry
                .records()
                .iter()
                .map(|record| record.report())
                .collect(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        *self.inner.state.borrow()
    }

    /// Failure counters of the run.
    pub fn stats(&self) -> &ProcessingStats {
        &self.inner.stats
    }

    /// Settings the scan was created with.
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// Live records, in first-submission order.
    pub fn records(&self) -> Vec<Arc<DomainRecord>> {
        self.inner.registry.records()
    }

    /// Number of unique domains registered.
    pub fn domain_count(&self) -> usize {
        self.inner.registry.len()
    }
}

impl ScanInner {
    /// Moves a running scan to `Cancelling`.
    fn enter_cancelling(&self) {
        self.state.send_if_modified(|state| {
            let running = *state == RunState::Running;
            if running {
                *state = RunState::Cancelling;
            }
            running
        });
    }

    /// Ends a run that could not be driven, recording `message` as its error.
    fn abandon(&self, message: String) {
        log::error!("{message}");
        let _ = self.error.set(message);
        self.cancel.cancel();
        if let Some(stream) = self.pipeline.as_ref().and_then(|p| p.stream.as_ref()) {
            stream.close();
        }
        self.state.send_replace(RunState::Done);
    }

    async fn run(self: Arc<Self>) {
        let Some(pipeline) = self.pipeline.clone() else {
            self.state.send_replace(RunState::Done);
            return;
        };

        self.state.send_replace(RunState::Running);
        // A cancel() that saw the state before this point only cancelled the token
        if self.cancel.is_cancelled() {
            self.enter_cancelling();
        }
        let records = self.registry.records();
        log::info!("Resolving MX records of {} domains", records.len());
        for record in records {
            self.domains
                .spawn(Arc::clone(&pipeline).resolve_domain(record));
        }

        // Stage 2 is only awaited once stage 1 has spawned all of it
        let outcome = match self.domains.wait().await {
            Ok(()) => pipeline.exchanges.wait().await,
            Err(interrupt) => Err(interrupt),
        };
        if let Err(interrupt) = outcome {
            log::warn!("Run interrupted: {interrupt}");
            let _ = self.error.set(interrupt.to_string());
            self.cancel.cancel();
            self.enter_cancelling();
        }
        self.domains.settle().await;
        pipeline.exchanges.settle().await;

        self.state.send_replace(RunState::Draining);
        if let Some(stream) = &pipeline.stream {
            stream.close();
        }
        let consumer = self
            .consumer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(consumer) = consumer {
            match consumer.await {
                Ok(delivered) => log::debug!("Notified {delivered} completed domains"),
                Err(e) => log::warn!("Result stream consumer failed: {e}"),
            }
        }

        self.state.send_replace(RunState::Done);
        log::info!("Run finished with {} recorded failures", self.stats.total_errors());
    }
}

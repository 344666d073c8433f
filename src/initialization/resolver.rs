//! DNS resolver initialization.
//!
//! This module builds the hickory resolver backing [`HickoryDnsClient`] from
//! scan settings.

use std::sync::Arc;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::Settings;
use crate::dns::HickoryDnsClient;
use crate::error_handling::InitializationError;

/// Initializes the DNS client for MX and address lookups.
///
/// Uses the custom name server from `settings` when one is configured, the
/// default resolver configuration otherwise. Every query gets a single attempt
/// bounded by `settings.lookup_timeout`, and the resolver cache is disabled so
/// each lookup reaches the name server.
///
/// # Errors
///
/// Returns `InitializationError::InvalidResolverAddress` or
/// `InitializationError::InvalidResolverPort` if the custom resolver is invalid.
pub fn init_resolver(settings: &Settings) -> Result<Arc<HickoryDnsClient>, InitializationError> {
    let mut opts = ResolverOpts::default();
    opts.timeout = settings.lookup_timeout;
    opts.attempts = 1;
    opts.cache_size = 0;
    // Set ndots to 0 to prevent search domain appending
    opts.ndots = 0;

    let config = match settings.name_server()? {
        Some(addr) => {
            log::debug!("Using custom DNS resolver {addr}");
            ResolverConfig::from_parts(
                None,
                vec![],
                NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true),
            )
        }
        None => ResolverConfig::default(),
    };

    Ok(Arc::new(HickoryDnsClient::new(TokioAsyncResolver::tokio(
        config, opts,
    ))))
}

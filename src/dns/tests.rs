//! DNS module tests.

use super::*;
use crate::config::Settings;
use crate::initialization::init_resolver;
use std::time::Duration;

/// Creates a test DNS client with short timeouts for faster test execution.
fn create_test_client() -> std::sync::Arc<HickoryDnsClient> {
    let settings = Settings {
        lookup_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    init_resolver(&settings).expect("default resolver configuration is valid")
}

#[tokio::test]
async fn test_init_resolver_rejects_invalid_address() {
    let settings = Settings {
        dns_ip: Some("300.1.1.1".to_string()),
        ..Default::default()
    };
    assert!(init_resolver(&settings).is_err());
}

#[tokio::test]
async fn test_init_resolver_accepts_custom_name_server() {
    let settings = Settings {
        dns_ip: Some("127.0.0.1".to_string()),
        dns_port: Some(5353),
        ..Default::default()
    };
    assert!(init_resolver(&settings).is_ok());
}

#[tokio::test]
async fn test_unreachable_name_server_is_a_transport_error() {
    // Nothing listens on the discard port; the single attempt must time out
    // (or be refused) and surface as a transport failure, not a protocol error
    let settings = Settings {
        dns_ip: Some("127.0.0.1".to_string()),
        dns_port: Some(9),
        lookup_timeout: Duration::from_millis(300),
        ..Default::default()
    };
    let client = init_resolver(&settings).unwrap();
    let result = client.lookup_mx("example.com").await;
    assert!(
        matches!(result, Err(crate::error_handling::LookupError::Transport(_))),
        "expected transport error, got {result:?}"
    );
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_mx_live() {
    let client = create_test_client();
    let lookup = client.lookup_mx("gmail.com").await.unwrap();
    assert!(lookup.protocol_error.is_none());
    assert!(!lookup.targets.is_empty(), "gmail.com should have MX records");
    assert!(lookup.raw_answer_count >= lookup.targets.len());
    for target in &lookup.targets {
        assert!(target.exchange.contains('.'));
    }
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_mx_nonexistent_domain_live() {
    let client = create_test_client();
    let lookup = client
        .lookup_mx("definitely-does-not-exist-12345.invalid")
        .await
        .unwrap();
    assert!(lookup.targets.is_empty());
    assert!(lookup.protocol_error.is_some());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_lookup_address_live() {
    let client = create_test_client();
    let lookup = client.lookup_address("one.one.one.one").await.unwrap();
    assert!(lookup.protocol_error.is_none());
    let address = lookup.address.expect("address should be present");
    assert!(address.parse::<std::net::IpAddr>().is_ok());
}

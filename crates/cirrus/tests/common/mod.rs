//! Common test utilities and helpers

use std::path::Path;

use cirrus::Client;
use wiremock::MockServer;

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Bearer token used by authenticated test clients
#[allow(dead_code)]
pub fn test_token() -> String {
    "tok_test_0123456789abcdef".to_string()
}

/// Client for `server` without credentials
#[allow(dead_code)]
pub fn anonymous_client(server: &MockServer) -> Client {
    Client::new(server.uri()).expect("Failed to build client")
}

/// Client for `server` that sends [`test_token`]
#[allow(dead_code)]
pub fn authed_client(server: &MockServer) -> Client {
    Client::builder(server.uri())
        .bearer_token(test_token())
        .build()
        .expect("Failed to build client")
}

/// `Authorization` header value for [`test_token`]
#[allow(dead_code)]
pub fn bearer() -> String {
    format!("Bearer {}", test_token())
}

/// Route SDK logs to the test output. Filter with `RUST_LOG`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for ocean-adapter tests

#![allow(dead_code)]

use std::sync::Arc;

use ocean_adapter::{OceanClient, OceanConfig};
use parking_lot::Mutex;
use serde_json::Value;
use wiremock::MockServer;

pub const BASE_TOKEN: &str = "0xAAA";
pub const QUOTE_TOKEN: &str = "0xBBB";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client whose every endpoint resolves against the mock server
pub fn client_for(server: &MockServer) -> OceanClient {
    let config = OceanConfig {
        api_url: Some(server.uri()),
        ..OceanConfig::default()
    };
    OceanClient::with_config(config).expect("client init")
}

/// Callback that stores every message it receives
pub fn collector() -> (Arc<Mutex<Vec<Value>>>, impl Fn(&Value) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = seen.clone();
    (seen, move |message: &Value| seen_cb.lock().push(message.clone()))
}

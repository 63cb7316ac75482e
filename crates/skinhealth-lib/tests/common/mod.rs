//! Shared helpers for integration tests: fake upstream servers and offline
//! provider configuration.

use axum::Router;
use skinhealth_lib::ProviderConfig;
use tokio::net::TcpListener;

/// Base URL of a local port nothing listens on; every request fails fast.
#[allow(dead_code)]
pub const CLOSED_PORT_URL: &str = "http://127.0.0.1:9";

/// API key the fake providers expect.
pub const TEST_KEY: &str = "test-key";

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("fake upstream address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("fake upstream serves");
    });
    format!("http://{addr}")
}

/// Provider configuration with every map provider pointed at `base`.
pub fn maps_config(base: &str) -> ProviderConfig {
    ProviderConfig::default()
        .with_maps_api_key(TEST_KEY)
        .with_maps_base_url(base)
}

/// Provider configuration with every network tier disabled.
#[allow(dead_code)]
pub fn offline_config() -> ProviderConfig {
    maps_config(CLOSED_PORT_URL)
}

//! Offline fixtures for handler tests.
//!
//! Every provider URL points at a closed local port, so requests made by
//! the state fail fast and the pipelines fall through to their local tiers.

use std::sync::atomic::{AtomicU64, Ordering};

use skinhealth_lib::ProviderConfig;

use crate::state::AppState;

/// A local port nothing listens on.
pub const CLOSED_PORT_URL: &str = "http://127.0.0.1:9";

/// A key accepted by the fixtures; the closed port rejects every call anyway.
pub const FAKE_API_KEY: &str = "test-key";

/// Provider configuration with every upstream unreachable.
pub fn offline_providers() -> ProviderConfig {
    ProviderConfig::default()
        .with_maps_base_url(CLOSED_PORT_URL)
        .with_gemini_url(CLOSED_PORT_URL)
}

/// State with no keys configured.
pub fn test_state() -> AppState {
    build(offline_providers(), None)
}

/// State whose keys are set but whose upstreams are unreachable.
pub fn keyed_test_state() -> AppState {
    build(
        offline_providers()
            .with_maps_api_key(FAKE_API_KEY)
            .with_ai_api_key(FAKE_API_KEY),
        None,
    )
}

/// State with a classifier base URL already configured.
pub fn test_state_with_classifier(url: &str) -> AppState {
    build(offline_providers(), Some(url))
}

/// State built from arbitrary providers, e.g. pointed at a fake upstream.
pub fn state_with_providers(providers: ProviderConfig) -> AppState {
    build(providers, None)
}

fn build(providers: ProviderConfig, classifier_url: Option<&str>) -> AppState {
    AppState::new(providers, classifier_url)
        .unwrap_or_else(|e| panic!("failed to build test state: {}", e))
}

/// Unique request id for assertions on error bodies.
pub fn test_request_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("test-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

//! Prometheus metrics for the SkinHealth backend.
//!
//! [`init_metrics`] installs the global recorder once at startup and
//! [`metrics_handler`] renders it for `GET /metrics`. The `record_*` helpers
//! below are safe to call before initialisation; without a recorder they
//! are no-ops.
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use skinhealth_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

const DEFAULT_PATH: &str = "/metrics";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route that serves the exposition text.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl MetricsConfig {
    /// - `METRICS_ENABLED`: anything but `false`/`0` enables (default: enabled)
    /// - `METRICS_PATH`: default `/metrics`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true);
        let path = lookup("METRICS_PATH")
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_PATH.to_string());
        Self { enabled, path }
    }
}

/// Install the Prometheus recorder.
///
/// # Errors
///
/// Fails when metrics are disabled, when called twice, or when another
/// global recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// `GET /metrics` in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Count a hospital search by the tier that answered (`none` when exhausted).
pub fn record_hospital_search(tier: Option<&str>) {
    metrics::counter!(
        "skinhealth_hospital_searches_total",
        "tier" => tier.unwrap_or("none").to_string()
    )
    .increment(1);
}

/// Count one per-hospital distance lookup by the tier that produced it.
pub fn record_distance_lookup(tier: &str) {
    metrics::counter!(
        "skinhealth_distance_lookups_total",
        "tier" => tier.to_string()
    )
    .increment(1);
}

/// Number of hospitals returned by one nearby search.
pub fn record_hospitals_returned(count: usize) {
    metrics::histogram!("skinhealth_hospitals_returned").record(count as f64);
}

/// Count a chat reply. `outcome` is `answered` or `fallback`.
pub fn record_chat_request(outcome: &str) {
    metrics::counter!(
        "skinhealth_chat_requests_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Count a classifier call. `outcome` is `success`, `rejected` or `failed`.
pub fn record_prediction(outcome: &str) {
    metrics::counter!(
        "skinhealth_predictions_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

//! Shared HTTP glue for the SkinHealth backend.
//!
//! This crate provides the pieces every handler needs:
//!
//! - [`AppState`]: locator, chat responder, classifier client and the
//!   [`ClassifierConfigStore`] holding the classifier base URL
//! - [`ApiProblem`]: the `{success:false, error}` error body
//! - [`ApiResponse`]: the `{success:true, ...}` success envelope
//! - [`health`]: status payloads for `/api/health` and `/api/config`
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request tracking and metrics middleware
//! - Request types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; all domain logic lives in `skinhealth-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON / multipart                           │
//! │  - Validate parameters                                      │
//! │  - Call skinhealth-lib APIs                                 │
//! │  - Format response                                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides offline state for handler testing.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{config_handler, health_handler, ConfigStatus, HealthStatus, API_VERSION};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_chat_request, record_distance_lookup,
    record_hospital_search, record_hospitals_returned, record_prediction, MetricsConfig,
    MetricsError,
};
pub use middleware::{
    extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER,
};
pub use problem::{from_lib_error, ApiProblem, ENDPOINT_NOT_FOUND, INTERNAL_SERVER_ERROR};
pub use request::{ChatRequest, ModelConfigRequest, NearbyRequest, Validate};
pub use response::{timestamp_now, ApiResponse};
pub use state::{AppState, AppStateError, ClassifierConfigStore};

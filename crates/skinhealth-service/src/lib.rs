//! SkinHealth backend HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/hospitals/nearby` - hospitals near a coordinate, nearest first
//! - `GET /api/hospitals/{id}` - hospital detail placeholder
//! - `POST /api/test-location` - nearby search around a fixed coordinate
//! - `POST /api/chatbot/message` - medical chatbot reply
//! - `GET /api/chatbot/test`, `GET /api/chatbot/models` - chatbot diagnostics
//! - `POST /api/predict` - forward an image to the remote classifier
//! - `GET|POST /api/ml-model/config` - read or set the classifier base URL
//! - `GET /api/health`, `GET /api/config` - configuration status
//! - `GET /metrics` - Prometheus metrics
//!
//! Unknown routes answer 404 `{"success":false,"error":"Endpoint not found"}`
//! and handler panics answer 500 `{"success":false,"error":"Internal server error"}`.

#![deny(warnings)]

pub mod routes;

use std::any::Any;
use std::env;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use skinhealth_service_shared::{
    config_handler, health_handler, metrics_handler, ApiProblem, AppState, MetricsConfig,
    MetricsLayer, INTERNAL_SERVER_ERROR,
};

/// Request bodies above this size are cut off before reaching a handler.
///
/// Leaves headroom over the 16 MiB upload cap for multipart framing, so
/// oversized files still get the upload-specific error message.
pub const BODY_LIMIT_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_PORT: u16 = 5000;

/// Process settings read by `main`.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub metrics: MetricsConfig,
    /// Classifier base URL to start with (`ML_MODEL_URL`).
    pub classifier_url: Option<String>,
}

impl ServiceConfig {
    /// - `SERVICE_PORT`: listen port (default: 5000)
    /// - `ML_MODEL_URL`: initial classifier base URL (optional)
    /// - `METRICS_ENABLED`, `METRICS_PATH`: see [`MetricsConfig::from_env`]
    pub fn from_env() -> Self {
        Self {
            port: env::var("SERVICE_PORT")
                .ok()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            metrics: MetricsConfig::from_env(),
            classifier_url: env::var("ML_MODEL_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Every API route, unlayered and without state.
pub fn api_routes(metrics_path: &str) -> Router<AppState> {
    Router::new()
        .route("/api/hospitals/nearby", post(routes::hospitals::nearby))
        .route("/api/hospitals/{id}", get(routes::hospitals::details))
        .route("/api/test-location", post(routes::hospitals::test_location))
        .route("/api/chatbot/message", post(routes::chatbot::message))
        .route("/api/chatbot/test", get(routes::chatbot::test))
        .route("/api/chatbot/models", get(routes::chatbot::models))
        .route("/api/predict", post(routes::classifier::predict))
        .route(
            "/api/ml-model/config",
            get(routes::classifier::get_config).post(routes::classifier::set_config),
        )
        .route("/api/health", get(health_handler))
        .route("/api/config", get(config_handler))
        .route(metrics_path, get(metrics_handler))
}

/// Fallback, body limit, metrics, CORS, tracing and panic recovery.
pub fn with_service_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(MetricsLayer)
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// The complete application.
pub fn build_router(state: AppState, metrics_path: &str) -> Router {
    with_service_layers(api_routes(metrics_path)).with_state(state)
}

async fn not_found() -> ApiProblem {
    ApiProblem::not_found()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "handler panicked");
    ApiProblem::internal_error(INTERNAL_SERVER_ERROR).into_response()
}

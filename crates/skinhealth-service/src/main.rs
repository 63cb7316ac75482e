//! SkinHealth backend HTTP service.
//!
//! # Configuration
//!
//! - `GOOGLE_MAPS_API_KEY`, `GOOGLE_AI_API_KEY` - provider keys (optional)
//! - `ML_MODEL_URL` - initial classifier base URL (optional)
//! - `SERVICE_PORT` - HTTP port (default: 5000)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint

use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn};

use skinhealth_lib::ProviderConfig;
use skinhealth_service::{build_router, ServiceConfig};
use skinhealth_service_shared::{init_logging, init_metrics, AppState, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&LoggingConfig::from_env().with_service("skinhealth-service"));

    let config = ServiceConfig::from_env();
    if let Err(e) = init_metrics(&config.metrics) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let providers = ProviderConfig::from_env();
    if !providers.maps_configured() {
        warn!("GOOGLE_MAPS_API_KEY not set; hospital search will use demo data and estimates");
    }
    if !providers.ai_configured() {
        warn!("GOOGLE_AI_API_KEY not set; chatbot will answer with fallback replies");
    }

    let state = AppState::new(providers, config.classifier_url.as_deref())
        .context("failed to build application state")?;
    let app = build_router(state, &config.metrics.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

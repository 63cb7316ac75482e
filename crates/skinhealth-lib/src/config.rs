//! Provider configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `GOOGLE_MAPS_API_KEY`: key for Places, Routes and Distance Matrix
//! - `GOOGLE_AI_API_KEY`: key for the Gemini text-generation API
//! - `GEMINI_MODEL`: generation model (default: `gemini-1.5-flash`)
//! - `PLACES_API_URL`, `PLACES_LEGACY_API_URL`, `ROUTES_API_URL`,
//!   `DISTANCE_MATRIX_API_URL`, `GEMINI_API_URL`: base URL overrides
//! - `UPSTREAM_TIMEOUT_SECS`: timeout for map providers (default: 10)
//! - `GENERATION_TIMEOUT_SECS`: timeout for chat and classifier calls (default: 30)
//! - `ENRICH_CONCURRENCY`: parallel distance lookups per request (default: 4)

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACES_URL: &str = "https://places.googleapis.com";
pub const DEFAULT_PLACES_LEGACY_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_ROUTES_URL: &str = "https://routes.googleapis.com";
pub const DEFAULT_DISTANCE_MATRIX_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Endpoints, credentials and limits for every upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub maps_api_key: Option<String>,
    pub ai_api_key: Option<String>,
    pub gemini_model: String,
    pub places_url: String,
    pub places_legacy_url: String,
    pub routes_url: String,
    pub distance_matrix_url: String,
    pub gemini_url: String,
    pub upstream_timeout: Duration,
    pub generation_timeout: Duration,
    pub enrich_concurrency: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            maps_api_key: None,
            ai_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            places_url: DEFAULT_PLACES_URL.to_string(),
            places_legacy_url: DEFAULT_PLACES_LEGACY_URL.to_string(),
            routes_url: DEFAULT_ROUTES_URL.to_string(),
            distance_matrix_url: DEFAULT_DISTANCE_MATRIX_URL.to_string(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            upstream_timeout: Duration::from_secs(10),
            generation_timeout: Duration::from_secs(30),
            enrich_concurrency: 4,
        }
    }
}

impl ProviderConfig {
    /// Create configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            maps_api_key: non_empty_var("GOOGLE_MAPS_API_KEY"),
            ai_api_key: non_empty_var("GOOGLE_AI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            places_url: base_url_var("PLACES_API_URL").unwrap_or(defaults.places_url),
            places_legacy_url: base_url_var("PLACES_LEGACY_API_URL")
                .unwrap_or(defaults.places_legacy_url),
            routes_url: base_url_var("ROUTES_API_URL").unwrap_or(defaults.routes_url),
            distance_matrix_url: base_url_var("DISTANCE_MATRIX_API_URL")
                .unwrap_or(defaults.distance_matrix_url),
            gemini_url: base_url_var("GEMINI_API_URL").unwrap_or(defaults.gemini_url),
            upstream_timeout: secs_var("UPSTREAM_TIMEOUT_SECS").unwrap_or(defaults.upstream_timeout),
            generation_timeout: secs_var("GENERATION_TIMEOUT_SECS")
                .unwrap_or(defaults.generation_timeout),
            enrich_concurrency: env::var("ENRICH_CONCURRENCY")
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .map(|n| n.max(1))
                .unwrap_or(defaults.enrich_concurrency),
        }
    }

    /// Point every map provider at a single base URL. Useful for fakes and proxies.
    pub fn with_maps_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.places_url = base.to_string();
        self.places_legacy_url = format!("{base}/maps/api/place");
        self.routes_url = base.to_string();
        self.distance_matrix_url = format!("{base}/maps/api/distancematrix/json");
        self
    }

    pub fn with_maps_api_key(mut self, key: impl Into<String>) -> Self {
        self.maps_api_key = Some(key.into());
        self
    }

    pub fn with_ai_api_key(mut self, key: impl Into<String>) -> Self {
        self.ai_api_key = Some(key.into());
        self
    }

    pub fn with_gemini_url(mut self, base: &str) -> Self {
        self.gemini_url = base.trim_end_matches('/').to_string();
        self
    }

    pub fn maps_configured(&self) -> bool {
        self.maps_api_key.is_some()
    }

    pub fn ai_configured(&self) -> bool {
        self.ai_api_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn base_url_var(name: &str) -> Option<String> {
    non_empty_var(name).map(|v| v.trim_end_matches('/').to_string())
}

fn secs_var(name: &str) -> Option<Duration> {
    non_empty_var(name)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

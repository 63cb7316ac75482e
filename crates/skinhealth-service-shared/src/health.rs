//! Status payloads for `GET /api/health` and `GET /api/config`.
//!
//! Both endpoints always answer 200; missing keys show up as
//! `not_configured` rather than as a failure, because every pipeline has a
//! local fallback.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Release version reported by `/api/health`.
pub const API_VERSION: &str = "4.0.0";

const CONFIGURED: &str = "configured";
const NOT_CONFIGURED: &str = "not_configured";

fn label(configured: bool) -> String {
    let text = if configured { CONFIGURED } else { NOT_CONFIGURED };
    text.to_string()
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub google_places_api: String,
    pub google_distance_matrix_api: String,
    pub google_ai_chatbot: String,
    pub ml_model_configured: bool,
    pub features: Vec<String>,
}

impl HealthStatus {
    pub fn new(maps_configured: bool, ai_configured: bool, ml_model_configured: bool) -> Self {
        Self {
            success: true,
            message: "SkinHealth API is running with Google Places, Distance Matrix, and AI Chatbot integration".to_string(),
            version: API_VERSION.to_string(),
            google_places_api: label(maps_configured),
            google_distance_matrix_api: label(maps_configured),
            google_ai_chatbot: label(ai_configured),
            ml_model_configured,
            features: [
                "Real hospital data from Google Places API",
                "Accurate driving distances from Routes and Distance Matrix APIs",
                "Turn-by-turn directions support",
                "Hospital ratings and reviews",
                "AI-powered medical chatbot using Google Gemini",
                "Skin condition classification through a remote model",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    pub async fn from_state(state: &AppState) -> Self {
        let providers = state.providers();
        Self::new(
            providers.maps_configured(),
            providers.ai_configured(),
            state.classifier_config().is_configured().await,
        )
    }
}

/// Body of `GET /api/config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStatus {
    pub success: bool,
    pub google_places_api_configured: bool,
    pub google_distance_matrix_api_configured: bool,
    pub google_ai_chatbot_configured: bool,
    pub ml_model_configured: bool,
    pub message: String,
}

impl ConfigStatus {
    pub fn new(maps_configured: bool, ai_configured: bool, ml_model_configured: bool) -> Self {
        let message = match (maps_configured, ai_configured) {
            (true, true) => "Google Places API, Distance Matrix API, and AI Chatbot are configured and ready to use",
            (true, false) => "Google Maps APIs are configured; the AI Chatbot key is missing",
            (false, true) => "AI Chatbot is configured; Google Maps APIs fall back to demo data and estimates",
            (false, false) => "No API keys configured; using demo data, estimated distances and fallback chat replies",
        };
        Self {
            success: true,
            google_places_api_configured: maps_configured,
            google_distance_matrix_api_configured: maps_configured,
            google_ai_chatbot_configured: ai_configured,
            ml_model_configured,
            message: message.to_string(),
        }
    }

    pub async fn from_state(state: &AppState) -> Self {
        let providers = state.providers();
        Self::new(
            providers.maps_configured(),
            providers.ai_configured(),
            state.classifier_config().is_configured().await,
        )
    }
}

/// `GET /api/health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::from_state(&state).await)
}

/// `GET /api/config`
pub async fn config_handler(State(state): State<AppState>) -> Json<ConfigStatus> {
    Json(ConfigStatus::from_state(&state).await)
}

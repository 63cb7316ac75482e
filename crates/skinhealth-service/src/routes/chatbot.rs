//! Medical chatbot endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use skinhealth_lib::chat::{EMPTY_REPLY, TEST_MESSAGE, UNAVAILABLE_REPLY};
use skinhealth_lib::ModelInfo;
use skinhealth_service_shared::{
    record_chat_request, timestamp_now, ApiProblem, ApiResponse, AppState, ChatRequest,
    RequestId, Validate,
};

use super::body_or_default;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub response: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub test_message: &'static str,
    pub response: String,
    pub api_key_configured: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub count: usize,
    pub message: String,
}

fn outcome(reply: &str) -> &'static str {
    if reply == UNAVAILABLE_REPLY || reply == EMPTY_REPLY {
        "fallback"
    } else {
        "answered"
    }
}

/// Handle `POST /api/chatbot/message`.
///
/// Generator failures are answered with a fixed reply, never with an error.
pub async fn message(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<ApiResponse<MessageResponse>, ApiProblem> {
    let request = body_or_default(body);
    request
        .validate(request_id.as_str())
        .map_err(|problem| *problem)?;

    info!(
        request_id = %request_id,
        chars = request.message_text().len(),
        history = request.conversation_history.len(),
        "chatbot message"
    );

    let reply = state
        .chat()
        .respond(request.message_text(), &request.conversation_history)
        .await;
    record_chat_request(outcome(&reply));

    Ok(ApiResponse::new(MessageResponse {
        response: reply,
        timestamp: timestamp_now(),
    }))
}

/// Handle `GET /api/chatbot/test`.
pub async fn test(State(state): State<AppState>, request_id: RequestId) -> ApiResponse<TestResponse> {
    info!(request_id = %request_id, "testing chatbot integration");

    let reply = state.chat().respond(TEST_MESSAGE, &[]).await;
    record_chat_request(outcome(&reply));

    ApiResponse::new(TestResponse {
        test_message: TEST_MESSAGE,
        response: reply,
        api_key_configured: state.chat().is_configured(),
        message: "Google AI integration test completed",
    })
}

/// Handle `GET /api/chatbot/models`.
pub async fn models(
    State(state): State<AppState>,
    request_id: RequestId,
) -> Result<ApiResponse<ModelsResponse>, ApiProblem> {
    let models = state.chat().list_models().await.map_err(|e| {
        warn!(request_id = %request_id, error = %e, "listing models failed");
        ApiProblem::internal_error(format!("Failed to list models: {}", e))
            .with_request_id(request_id.as_str())
    })?;

    let count = models.len();
    info!(request_id = %request_id, count, "listed generator models");
    Ok(ApiResponse::new(ModelsResponse {
        models,
        count,
        message: format!("Found {} available models", count),
    }))
}

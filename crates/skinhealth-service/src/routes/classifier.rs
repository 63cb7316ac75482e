//! Skin-condition classifier proxy and its configuration.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use skinhealth_lib::classifier::MAX_UPLOAD_BYTES;
use skinhealth_lib::{preprocess_image, validate_upload, Error as LibError};
use skinhealth_service_shared::{
    from_lib_error, record_prediction, ApiProblem, ApiResponse, AppState, ModelConfigRequest,
    RequestId, Validate, INTERNAL_SERVER_ERROR,
};

use super::body_or_default;

/// Multipart field holding the image.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// The classifier's answer, passed through untouched.
    pub prediction: Value,
}

#[derive(Debug, Serialize)]
pub struct ModelConfigResponse {
    pub configured: bool,
    pub ngrok_url: Option<String>,
    pub message: &'static str,
}

/// First `file` field as `(filename, bytes)`, or `None` when absent.
async fn read_upload(
    multipart: &mut Multipart,
) -> Result<Option<(String, Vec<u8>)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Some((filename, bytes.to_vec())));
    }
    Ok(None)
}

fn multipart_problem(error: &MultipartError) -> ApiProblem {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiProblem::bad_request(format!(
            "File too large. Maximum size is {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        ApiProblem::bad_request(format!("Invalid multipart body: {}", error.body_text()))
    }
}

fn rejected(problem: ApiProblem, request_id: &RequestId) -> ApiProblem {
    record_prediction("rejected");
    warn!(request_id = %request_id, error = %problem.error, "prediction request rejected");
    problem.with_request_id(request_id.as_str())
}

/// Handle `POST /api/predict`.
pub async fn predict(
    State(state): State<AppState>,
    request_id: RequestId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<PredictionResponse>, ApiProblem> {
    let no_file = || ApiProblem::bad_request("No file provided");

    let mut multipart = multipart.map_err(|_| rejected(no_file(), &request_id))?;
    let (filename, bytes) = read_upload(&mut multipart)
        .await
        .map_err(|e| rejected(multipart_problem(&e), &request_id))?
        .ok_or_else(|| rejected(no_file(), &request_id))?;

    validate_upload(&filename, bytes.len())
        .map_err(|e| rejected(from_lib_error(&e, request_id.as_str()), &request_id))?;

    // Decoding and resizing is CPU-bound; keep it off the async workers.
    let jpeg = tokio::task::spawn_blocking(move || preprocess_image(&bytes))
        .await
        .map_err(|e| {
            record_prediction("failed");
            error!(request_id = %request_id, error = %e, "image preprocessing task failed");
            ApiProblem::internal_error(INTERNAL_SERVER_ERROR).with_request_id(request_id.as_str())
        })?
        .map_err(|e| rejected(from_lib_error(&e, request_id.as_str()), &request_id))?;

    let Some(base_url) = state.classifier_config().get().await else {
        return Err(rejected(
            from_lib_error(&LibError::ClassifierNotConfigured, request_id.as_str()),
            &request_id,
        ));
    };

    info!(request_id = %request_id, filename = %filename, "classifying upload");
    match state.classifier().predict(&base_url, jpeg).await {
        Ok(prediction) => {
            record_prediction("success");
            Ok(ApiResponse::new(PredictionResponse { prediction }))
        }
        Err(e) => {
            record_prediction("failed");
            warn!(request_id = %request_id, error = %e, "classifier call failed");
            Err(from_lib_error(&e, request_id.as_str()))
        }
    }
}

/// Handle `GET /api/ml-model/config`.
pub async fn get_config(State(state): State<AppState>) -> ApiResponse<ModelConfigResponse> {
    let url = state.classifier_config().get().await;
    let message = if url.is_some() {
        "ML model is configured"
    } else {
        "ML model URL not configured. Use POST to set ngrok_url."
    };
    ApiResponse::new(ModelConfigResponse {
        configured: url.is_some(),
        ngrok_url: url,
        message,
    })
}

/// Handle `POST /api/ml-model/config`.
pub async fn set_config(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<ModelConfigRequest>, JsonRejection>,
) -> Result<ApiResponse<ModelConfigResponse>, ApiProblem> {
    let request = body_or_default(body);
    request
        .validate(request_id.as_str())
        .map_err(|problem| *problem)?;

    let raw = request.ngrok_url.as_deref().unwrap_or_default();
    let url = state
        .classifier_config()
        .set(raw)
        .await
        .map_err(|e| from_lib_error(&e, request_id.as_str()))?;

    info!(request_id = %request_id, url = %url, "classifier URL updated");
    Ok(ApiResponse::new(ModelConfigResponse {
        configured: true,
        ngrok_url: Some(url),
        message: "ML model URL configured successfully",
    }))
}

//! JSON error bodies for HTTP APIs.
//!
//! Every failure answers with `{"success": false, "error": "..."}` and the
//! matching status code, so the browser frontend can treat all endpoints
//! alike.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use skinhealth_lib::Error as LibError;

/// Error text for unknown routes.
pub const ENDPOINT_NOT_FOUND: &str = "Endpoint not found";

/// Error text for unhandled faults.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Error response body.
///
/// # Example
///
/// ```
/// use skinhealth_service_shared::ApiProblem;
///
/// let problem = ApiProblem::bad_request("Message is required").with_request_id("req-12345");
/// assert_eq!(problem.status, 400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiProblem {
    /// Always `false`.
    pub success: bool,

    /// Human-readable explanation of this failure.
    pub error: String,

    /// Correlation identifier of the failed request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// HTTP status code; carried in the status line, not the body.
    #[serde(skip)]
    pub status: u16,
}

impl ApiProblem {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            request_id: None,
            status: status.as_u16(),
        }
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// 400 for invalid input.
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 404 for unknown routes.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ENDPOINT_NOT_FOUND)
    }

    pub fn internal_error(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    /// 502 when a collaborator answered badly.
    pub fn bad_gateway(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, error)
    }

    /// 503 when a collaborator is not configured.
    pub fn service_unavailable(error: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, error)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ApiProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl std::error::Error for ApiProblem {}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Convert library errors to an [`ApiProblem`].
pub fn from_lib_error(error: &LibError, request_id: &str) -> ApiProblem {
    let problem = match error {
        LibError::InvalidUpload(message) => ApiProblem::bad_request(message.clone()),
        LibError::Image(e) => ApiProblem::bad_request(format!("Invalid image file: {}", e)),
        LibError::InvalidClassifierUrl { .. } => ApiProblem::bad_request(
            "Invalid URL format. URL must start with http:// or https://",
        ),
        LibError::ClassifierNotConfigured => ApiProblem::service_unavailable(error.to_string()),
        LibError::MissingApiKey { .. } => ApiProblem::service_unavailable(error.to_string()),
        LibError::UpstreamStatus { .. }
        | LibError::UpstreamPayload { .. }
        | LibError::NoRoute { .. }
        | LibError::Http(_) => ApiProblem::bad_gateway(error.to_string()),
        LibError::Json(_) => ApiProblem::internal_error(INTERNAL_SERVER_ERROR),
    };
    problem.with_request_id(request_id)
}

//! Response envelope for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Success envelope: `{"success": true, ...payload fields}`.
///
/// This mirrors [`ApiProblem`](crate::ApiProblem) so the frontend can branch
/// on `success` alone.
///
/// # Example
///
/// ```
/// use skinhealth_service_shared::ApiResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Pong {
///     message: &'static str,
/// }
///
/// let response = ApiResponse::new(Pong { message: "pong" });
/// assert!(response.success);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,

    /// The actual response payload.
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T> From<T> for ApiResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Current UTC time in RFC 3339 with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        value: i32,
    }

    #[test]
    fn test_response_flatten_serialization() {
        let response = ApiResponse::new(TestData { value: 42 });
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(json, r#"{"success":true,"value":42}"#);
        assert!(!json.contains("\"data\":{"));
    }

    #[test]
    fn test_response_from_trait() {
        let data = TestData { value: 99 };
        let response: ApiResponse<TestData> = data.clone().into();
        assert_eq!(response.data, data);
        assert!(response.success);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"success":true,"value":7}"#;
        let response: ApiResponse<TestData> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.value, 7);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let ts = timestamp_now();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}

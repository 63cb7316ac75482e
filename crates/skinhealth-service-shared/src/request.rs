//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use skinhealth_lib::{ChatTurn, Coordinate, SearchRequest, DEFAULT_RADIUS_METERS};

use crate::ApiProblem;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return an `ApiProblem`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is attached to any returned `ApiProblem`.
    ///
    /// Returns a boxed `ApiProblem` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ApiProblem>>;
}

fn bad_request(message: impl Into<String>, request_id: &str) -> Box<ApiProblem> {
    Box::new(ApiProblem::bad_request(message).with_request_id(request_id))
}

/// Interpret a JSON number or numeric string.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Body of `POST /api/hospitals/nearby`.
///
/// Coordinates and radius may arrive as JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyRequest {
    #[serde(default)]
    pub lat: Option<Value>,

    #[serde(default)]
    pub lng: Option<Value>,

    /// Search radius in metres (default: 25000).
    #[serde(default)]
    pub radius: Option<Value>,
}

impl NearbyRequest {
    pub fn new(lat: f64, lng: f64, radius: Option<u32>) -> Self {
        Self {
            lat: Some(Value::from(lat)),
            lng: Some(Value::from(lng)),
            radius: radius.map(Value::from),
        }
    }

    /// Parse into a [`SearchRequest`], reporting the first problem found.
    pub fn to_search_request(&self, request_id: &str) -> Result<SearchRequest, Box<ApiProblem>> {
        let (raw_lat, raw_lng) = match (&self.lat, &self.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            (lat, lng) => {
                let missing: Vec<&str> = [("lat", lat.is_none()), ("lng", lng.is_none())]
                    .into_iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(name, _)| name)
                    .collect();
                return Err(bad_request(
                    format!(
                        "Latitude and longitude are required (missing: {})",
                        missing.join(", ")
                    ),
                    request_id,
                ));
            }
        };

        let coordinate = |name: &str, raw: &Value| -> Result<f64, Box<ApiProblem>> {
            numeric(raw).ok_or_else(|| {
                bad_request(
                    format!(
                        "Invalid latitude or longitude values: {} must be a number, got {}",
                        name, raw
                    ),
                    request_id,
                )
            })
        };
        let lat = coordinate("lat", raw_lat)?;
        let lng = coordinate("lng", raw_lng)?;

        let radius_meters = match &self.radius {
            None => DEFAULT_RADIUS_METERS,
            Some(raw) => numeric(raw)
                .filter(|r| *r > 0.0 && r.fract() == 0.0 && *r <= f64::from(u32::MAX))
                .map(|r| r as u32)
                .ok_or_else(|| {
                    bad_request(
                        format!(
                            "Invalid radius value: expected a positive whole number of metres, got {}",
                            raw
                        ),
                        request_id,
                    )
                })?,
        };

        Ok(SearchRequest::new(Coordinate::new(lat, lng), radius_meters))
    }
}

impl Validate for NearbyRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ApiProblem>> {
        self.to_search_request(request_id).map(|_| ())
    }
}

/// Body of `POST /api/chatbot/message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,

    /// Prior turns, oldest first.
    #[serde(default, deserialize_with = "lenient_history")]
    pub conversation_history: Vec<ChatTurn>,
}

/// History is best-effort context: `null` or a non-array reads as empty and
/// turns that are not objects are dropped, so it never fails the request.
fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<ChatTurn>, D::Error>
where
    D: Deserializer<'de>,
{
    let turns = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(turns)
}

impl ChatRequest {
    /// The trimmed message; call after [`Validate::validate`].
    pub fn message_text(&self) -> &str {
        self.message.as_deref().map(str::trim).unwrap_or_default()
    }
}

impl Validate for ChatRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ApiProblem>> {
        match self.message.as_deref() {
            None => Err(bad_request("Message is required", request_id)),
            Some(message) if message.trim().is_empty() => {
                Err(bad_request("Message cannot be empty", request_id))
            }
            Some(_) => Ok(()),
        }
    }
}

/// Body of `POST /api/ml-model/config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfigRequest {
    #[serde(default)]
    pub ngrok_url: Option<String>,
}

impl Validate for ModelConfigRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ApiProblem>> {
        match self.ngrok_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(()),
            _ => Err(bad_request("ngrok_url is required", request_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nearby(body: Value) -> NearbyRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_nearby_accepts_numbers_and_strings() {
        let request = nearby(json!({"lat": "13.0358", "lng": 77.554, "radius": "5000"}))
            .to_search_request("req")
            .unwrap();
        assert_eq!(request.origin, Coordinate::new(13.0358, 77.554));
        assert_eq!(request.radius_meters, 5000);
    }

    #[test]
    fn test_nearby_default_radius() {
        let request = NearbyRequest::new(1.0, 2.0, None)
            .to_search_request("req")
            .unwrap();
        assert_eq!(request.radius_meters, DEFAULT_RADIUS_METERS);
    }

    #[test]
    fn test_nearby_names_missing_fields() {
        let err = nearby(json!({})).validate("req").unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(
            err.error,
            "Latitude and longitude are required (missing: lat, lng)"
        );

        let err = nearby(json!({"lat": 1.0, "lng": null})).validate("req").unwrap_err();
        assert!(err.error.ends_with("(missing: lng)"));
    }

    #[test]
    fn test_nearby_rejects_non_numeric() {
        let err = nearby(json!({"lat": "north", "lng": 2.0})).validate("req").unwrap_err();
        assert!(err.error.starts_with("Invalid latitude or longitude values"));
        assert!(err.error.contains("lat"));

        let err = nearby(json!({"lat": 1.0, "lng": [2.0]})).validate("req").unwrap_err();
        assert!(err.error.contains("lng"));
    }

    #[test]
    fn test_nearby_rejects_bad_radius() {
        for radius in [json!(0), json!(-5), json!(12.5), json!("wide"), json!(true)] {
            let err = nearby(json!({"lat": 1.0, "lng": 2.0, "radius": radius}))
                .validate("req")
                .unwrap_err();
            assert!(err.error.starts_with("Invalid radius value"));
        }
    }

    #[test]
    fn test_chat_request_validation() {
        let missing: ChatRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.validate("r").unwrap_err().error, "Message is required");

        let blank: ChatRequest = serde_json::from_value(json!({"message": "   "})).unwrap();
        assert_eq!(blank.validate("r").unwrap_err().error, "Message cannot be empty");

        let ok: ChatRequest = serde_json::from_value(json!({
            "message": "  What is eczema? ",
            "conversation_history": [{"role": "user", "content": "hi"}]
        }))
        .unwrap();
        assert!(ok.validate("r").is_ok());
        assert_eq!(ok.message_text(), "What is eczema?");
        assert_eq!(ok.conversation_history.len(), 1);
    }

    #[test]
    fn test_chat_history_is_lenient() {
        let null: ChatRequest =
            serde_json::from_value(json!({"message": "hi", "conversation_history": null}))
                .unwrap();
        assert!(null.validate("r").is_ok());
        assert!(null.conversation_history.is_empty());

        let mixed: ChatRequest = serde_json::from_value(json!({
            "message": "hi",
            "conversation_history": [
                {"role": "assistant"},
                {"role": "user", "content": "itchy rash"},
                "stray",
                {"role": "user", "content": null}
            ]
        }))
        .unwrap();
        assert_eq!(
            mixed.conversation_history,
            vec![ChatTurn::assistant(""), ChatTurn::user("itchy rash")]
        );

        let scalar: ChatRequest =
            serde_json::from_value(json!({"message": "hi", "conversation_history": "x"})).unwrap();
        assert!(scalar.conversation_history.is_empty());
    }

    #[test]
    fn test_model_config_requires_url() {
        let blank = ModelConfigRequest {
            ngrok_url: Some("  ".to_string()),
        };
        assert_eq!(blank.validate("r").unwrap_err().status, 400);
        assert!(ModelConfigRequest::default().validate("r").is_err());

        let ok = ModelConfigRequest {
            ngrok_url: Some("https://x.ngrok.app".to_string()),
        };
        assert!(ok.validate("r").is_ok());
    }
}

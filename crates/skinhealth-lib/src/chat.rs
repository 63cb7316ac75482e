//! Medical assistant chat backed by the Gemini `generateContent` REST API.
//!
//! [`ChatResponder::respond`] never fails: generator errors and empty
//! completions are replaced by fixed replies that point the user at a
//! healthcare professional. [`ChatResponder::generate`] exposes the raw
//! outcome for diagnostics.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::google::ensure_success;

/// Instructions sent ahead of every user question.
pub const SYSTEM_PROMPT: &str = "You are a helpful medical assistant for a skin health application. You provide information about:
- Skin conditions (eczema, psoriasis, acne, rashes, etc.)
- General healthcare advice
- When to see a doctor or dermatologist
- Skin care tips and treatments

Important guidelines:
- Always emphasize that you're providing general information, not medical diagnosis
- Recommend consulting healthcare professionals for serious concerns
- Be empathetic and supportive
- Keep responses concise but informative
- If asked about non-medical topics, politely redirect to health-related questions
- For emergencies, always recommend immediate medical attention
- Use **bold text** for important warnings or key points
- Use clear, well-structured paragraphs
- Avoid excessive asterisks or special characters

Current user question: ";

/// Reply used when the generator answers without any text.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response at the moment. Please try again or consult with a healthcare professional.";

/// Reply used when the generator cannot be reached or fails.
pub const UNAVAILABLE_REPLY: &str = "I'm experiencing technical difficulties right now. For medical concerns, please consult with a healthcare professional or use our Hospital Finder feature to locate specialists near you.";

/// Question used by the integration self-test.
pub const TEST_MESSAGE: &str = "What is eczema?";

/// Prior turns forwarded to the generator.
pub const MAX_HISTORY_TURNS: usize = 10;

/// One prior message in a conversation, as sent by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `user` or `assistant`; anything other than `user` is treated as the assistant.
    #[serde(default)]
    pub role: String,
    /// Empty when the frontend omits it; empty turns are not forwarded.
    #[serde(default)]
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    fn gemini_role(&self) -> &'static str {
        if self.role.eq_ignore_ascii_case("user") {
            "user"
        } else {
            "model"
        }
    }
}

/// Model metadata reported by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<RawModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModel {
    #[serde(default)]
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<RawModel> for ModelInfo {
    fn from(raw: RawModel) -> Self {
        Self {
            name: raw.name,
            display_name: raw.display_name.unwrap_or_else(|| "N/A".to_string()),
            description: raw.description.unwrap_or_else(|| "N/A".to_string()),
            supported_generation_methods: raw.supported_generation_methods,
        }
    }
}

fn text_content(role: &str, text: impl Into<String>) -> Content {
    Content {
        role: Some(role.to_string()),
        parts: vec![Part { text: text.into() }],
    }
}

/// Build the `contents` array: trailing history, then the prompted question.
fn build_contents(message: &str, history: &[ChatTurn]) -> Vec<Content> {
    let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);
    let mut contents: Vec<Content> = history[skip..]
        .iter()
        .filter(|turn| !turn.content.trim().is_empty())
        .map(|turn| text_content(turn.gemini_role(), turn.content.as_str()))
        .collect();
    contents.push(text_content("user", format!("{SYSTEM_PROMPT}{message}")));
    contents
}

/// Gemini client for the medical assistant.
#[derive(Debug, Clone)]
pub struct ChatResponder {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ChatResponder {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.generation_timeout)
            .build()?;
        Ok(Self {
            http,
            api_key: config.ai_api_key.clone(),
            base_url: config.gemini_url.clone(),
            model: config.gemini_model.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(Error::MissingApiKey { service: "gemini" })
    }

    /// Ask the generator. `Ok(None)` means it answered with no text.
    pub async fn generate(&self, message: &str, history: &[ChatTurn]) -> Result<Option<String>> {
        let key = self.api_key()?;
        let body = GenerateRequest {
            contents: build_contents(message, history),
        };
        debug!(model = %self.model, turns = body.contents.len(), "sending generation request");

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;
        let payload: GenerateResponse = ensure_success("gemini", response)?.json().await?;

        let text: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    /// Reply to `message`, substituting a fixed reply on any failure.
    pub async fn respond(&self, message: &str, history: &[ChatTurn]) -> String {
        match self.generate(message, history).await {
            Ok(Some(reply)) => {
                info!(chars = reply.len(), "generated chat reply");
                reply
            }
            Ok(None) => {
                warn!("generator returned no text");
                EMPTY_REPLY.to_string()
            }
            Err(error) => {
                warn!(error = %error, "chat generation failed");
                UNAVAILABLE_REPLY.to_string()
            }
        }
    }

    /// Models visible to the configured key.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let key = self.api_key()?;
        let response = self
            .http
            .get(format!("{}/v1beta/models", self.base_url))
            .query(&[("key", key)])
            .send()
            .await?;
        let payload: ModelsResponse = ensure_success("gemini", response)?.json().await?;
        Ok(payload.models.into_iter().map(ModelInfo::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_end_with_prompted_question() {
        let contents = build_contents("Is this rash serious?", &[]);
        assert_eq!(contents.len(), 1);
        let last = &contents[0];
        assert_eq!(last.role.as_deref(), Some("user"));
        assert!(last.parts[0].text.starts_with("You are a helpful medical assistant"));
        assert!(last.parts[0].text.ends_with("Current user question: Is this rash serious?"));
    }

    #[test]
    fn history_is_mapped_and_bounded() {
        let history: Vec<ChatTurn> = (0..14)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("q{i}"))
                } else {
                    ChatTurn::assistant(format!("a{i}"))
                }
            })
            .collect();
        let contents = build_contents("next", &history);
        assert_eq!(contents.len(), MAX_HISTORY_TURNS + 1);
        assert_eq!(contents[0].parts[0].text, "q4");
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn blank_history_entries_are_skipped() {
        let contents = build_contents("hi", &[ChatTurn::assistant("  ")]);
        assert_eq!(contents.len(), 1);
    }

    #[test]
    fn raw_model_defaults_missing_metadata() {
        let raw: RawModel = serde_json::from_str(r#"{"name":"models/x"}"#).unwrap();
        let info = ModelInfo::from(raw);
        assert_eq!(info.display_name, "N/A");
        assert_eq!(info.description, "N/A");
        assert!(info.supported_generation_methods.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_responder_uses_fixed_reply() {
        let responder = ChatResponder::new(&ProviderConfig::default()).unwrap();
        assert!(!responder.is_configured());
        assert!(matches!(
            responder.generate("hi", &[]).await,
            Err(Error::MissingApiKey { service: "gemini" })
        ));
        assert_eq!(responder.respond("hi", &[]).await, UNAVAILABLE_REPLY);
    }
}

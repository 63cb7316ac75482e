//! Blocking client for a running SkinHealth backend.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{multipart, Client, Response};
use serde_json::{json, Value};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/ml-model/config`
    pub fn configure_model(&self, ngrok_url: &str) -> Result<Value> {
        let url = self.url("/api/ml-model/config");
        let response = self
            .http
            .post(&url)
            .json(&json!({ "ngrok_url": ngrok_url }))
            .send()
            .with_context(|| format!("failed to reach {}", url))?;
        read_json(response)
    }

    /// `GET /api/ml-model/config`
    pub fn model_status(&self) -> Result<Value> {
        self.get("/api/ml-model/config")
    }

    /// `POST /api/predict` with the image at `path`.
    pub fn predict(&self, path: &Path) -> Result<Value> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let part = multipart::Part::bytes(bytes).file_name(filename);
        let form = multipart::Form::new().part("file", part);

        let url = self.url("/api/predict");
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .with_context(|| format!("failed to reach {}", url))?;
        read_json(response)
    }

    /// `GET /api/chatbot/test`
    pub fn chat_test(&self) -> Result<Value> {
        self.get("/api/chatbot/test")
    }

    /// `GET /api/chatbot/models`
    pub fn chat_models(&self) -> Result<Value> {
        self.get("/api/chatbot/models")
    }

    fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("failed to reach {}", url))?;
        read_json(response)
    }
}

/// Parse a backend reply, turning `{success:false}` bodies into errors.
fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().context("failed to read backend response")?;
    let body: Value = serde_json::from_str(&text)
        .with_context(|| format!("backend returned non-JSON response (HTTP {})", status))?;

    if status.is_success() && body["success"] != Value::Bool(false) {
        return Ok(body);
    }
    let message = body["error"].as_str().unwrap_or("unknown error");
    Err(anyhow!("backend returned HTTP {}: {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let client = BackendClient::new(" http://localhost:5000/ ").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn unreachable_backend_is_an_error() {
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        let err = client.model_status().unwrap_err();
        assert!(err.to_string().contains("failed to reach"));
    }
}

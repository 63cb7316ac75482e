//! Application state for the HTTP service.
//!
//! Handlers reach the hospital locator, the chat responder, the classifier
//! client and the classifier base URL through [`AppState`].

use std::sync::Arc;

use skinhealth_lib::{
    normalize_base_url, ChatResponder, ClassifierClient, Error as LibError, HospitalLocator,
    ProviderConfig,
};
use tokio::sync::RwLock;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to build an outbound HTTP client.
    Client(LibError),

    /// The initial classifier URL is malformed.
    InvalidClassifierUrl(String),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(e) => write!(f, "failed to build provider clients: {}", e),
            Self::InvalidClassifierUrl(url) => write!(f, "invalid classifier URL: {}", url),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            Self::InvalidClassifierUrl(_) => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::Client(err)
    }
}

/// Guarded store for the classifier base URL.
///
/// Cloning shares the same underlying value. The URL is kept in memory only
/// and is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfigStore {
    url: Arc<RwLock<Option<String>>>,
}

impl ClassifierConfigStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            url: Arc::new(RwLock::new(initial)),
        }
    }

    /// Current base URL, if configured.
    pub async fn get(&self) -> Option<String> {
        self.url.read().await.clone()
    }

    pub async fn is_configured(&self) -> bool {
        self.url.read().await.is_some()
    }

    /// Validate, normalize and store a new base URL. Returns the stored value.
    pub async fn set(&self, raw: &str) -> Result<String, LibError> {
        let normalized = normalize_base_url(raw)?;
        *self.url.write().await = Some(normalized.clone());
        tracing::info!(url = %normalized, "classifier URL configured");
        Ok(normalized)
    }

    pub async fn clear(&self) {
        *self.url.write().await = None;
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (using `Arc` internally); share it via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    providers: ProviderConfig,
    locator: HospitalLocator,
    chat: ChatResponder,
    classifier: ClassifierClient,
    classifier_config: ClassifierConfigStore,
}

impl AppState {
    /// Build state from provider configuration and an optional initial classifier URL.
    pub fn new(
        providers: ProviderConfig,
        classifier_url: Option<&str>,
    ) -> Result<Self, AppStateError> {
        let initial = classifier_url
            .map(|raw| {
                normalize_base_url(raw)
                    .map_err(|_| AppStateError::InvalidClassifierUrl(raw.to_string()))
            })
            .transpose()?;

        tracing::info!(
            maps_configured = providers.maps_configured(),
            ai_configured = providers.ai_configured(),
            classifier_configured = initial.is_some(),
            "building application state"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                locator: HospitalLocator::new(&providers)?,
                chat: ChatResponder::new(&providers)?,
                classifier: ClassifierClient::new(&providers)?,
                classifier_config: ClassifierConfigStore::new(initial),
                providers,
            }),
        })
    }

    pub fn providers(&self) -> &ProviderConfig {
        &self.inner.providers
    }

    pub fn locator(&self) -> &HospitalLocator {
        &self.inner.locator
    }

    pub fn chat(&self) -> &ChatResponder {
        &self.inner.chat
    }

    pub fn classifier(&self) -> &ClassifierClient {
        &self.inner.classifier
    }

    pub fn classifier_config(&self) -> &ClassifierConfigStore {
        &self.inner.classifier_config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("maps_configured", &self.inner.providers.maps_configured())
            .field("ai_configured", &self.inner.providers.ai_configured())
            .finish()
    }
}

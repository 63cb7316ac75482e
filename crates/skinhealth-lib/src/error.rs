use thiserror::Error;

/// Convenient result alias for the SkinHealth library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An upstream service answered with a non-success HTTP status.
    #[error("{service} responded with HTTP {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    /// An upstream service answered, but the payload was unusable.
    #[error("{service} returned an unusable payload: {message}")]
    UpstreamPayload {
        service: &'static str,
        message: String,
    },

    /// A provider call was skipped because its API key is not configured.
    #[error("{service} API key is not configured")]
    MissingApiKey { service: &'static str },

    /// The routing provider returned no route between the two points.
    #[error("no route found between {origin} and {destination}")]
    NoRoute { origin: String, destination: String },

    /// The image classifier base URL has not been configured yet.
    #[error("ML model URL not configured. Please configure the ngrok URL first.")]
    ClassifierNotConfigured,

    /// The supplied classifier base URL is malformed.
    #[error("invalid classifier URL '{url}': must start with http:// or https://")]
    InvalidClassifierUrl { url: String },

    /// An uploaded file failed validation.
    #[error("{0}")]
    InvalidUpload(String),

    /// Image bytes could not be decoded or re-encoded.
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error originates from the caller's input rather than an upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidUpload(_) | Error::Image(_) | Error::InvalidClassifierUrl { .. }
        )
    }
}

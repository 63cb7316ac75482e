//! Proxy to the external skin-condition classifier.
//!
//! Uploads are validated, normalized to a 224x224 RGB JPEG and forwarded as
//! multipart field `file` to `<base>/predict`. The classifier's JSON answer
//! is passed through untouched.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::google::ensure_success;

/// Accepted upload extensions, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Side length of the square image the classifier expects.
pub const MODEL_INPUT_SIZE: u32 = 224;

fn has_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Check an upload's name and size before touching its contents.
pub fn validate_upload(filename: &str, len: usize) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(Error::InvalidUpload("No file selected".to_string()));
    }
    if !has_allowed_extension(filename) {
        return Err(Error::InvalidUpload(format!(
            "File type not allowed. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    if len == 0 {
        return Err(Error::InvalidUpload("Uploaded file is empty".to_string()));
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(Error::InvalidUpload(format!(
            "File too large. Maximum size is {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Decode, convert to RGB, resize to [`MODEL_INPUT_SIZE`] and re-encode as JPEG.
pub fn preprocess_image(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();
    let resized = image::imageops::resize(
        &rgb,
        MODEL_INPUT_SIZE,
        MODEL_INPUT_SIZE,
        FilterType::Lanczos3,
    );

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(resized).write_to(&mut out, ImageFormat::Jpeg)?;
    debug!(
        input_bytes = bytes.len(),
        output_bytes = out.get_ref().len(),
        "image preprocessed"
    );
    Ok(out.into_inner())
}

/// Validate and trim a classifier base URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(Error::InvalidClassifierUrl {
            url: raw.trim().to_string(),
        }),
    }
}

/// HTTP client for the classifier's `/predict` endpoint.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    http: Client,
}

impl ClassifierClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.generation_timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Forward a preprocessed JPEG to `<base_url>/predict`.
    pub async fn predict(&self, base_url: &str, jpeg: Vec<u8>) -> Result<serde_json::Value> {
        let url = format!("{}/predict", base_url.trim_end_matches('/'));
        info!(url = %url, bytes = jpeg.len(), "forwarding image to classifier");

        let part = Part::bytes(jpeg)
            .file_name("image.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send().await?;
        let body = ensure_success("classifier", response)?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::UpstreamPayload {
            service: "classifier",
            message: format!("response is not JSON: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([200u8, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(validate_upload("lesion.JPG", 10).is_ok());
        assert!(validate_upload("scan.tiff", 10).is_ok());
    }

    #[test]
    fn rejects_bad_uploads() {
        let cases = [
            ("", 10, "No file selected"),
            ("notes.txt", 10, "File type not allowed"),
            ("noext", 10, "File type not allowed"),
            ("a.png", 0, "empty"),
            ("a.png", MAX_UPLOAD_BYTES + 1, "too large"),
        ];
        for (name, len, needle) in cases {
            let err = validate_upload(name, len).unwrap_err();
            assert!(err.is_client_error());
            assert!(err.to_string().contains(needle), "{name}: {err}");
        }
    }

    #[test]
    fn preprocess_outputs_square_rgb_jpeg() {
        let jpeg = preprocess_image(&png_bytes(40, 30)).unwrap();
        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.width(), MODEL_INPUT_SIZE);
        assert_eq!(decoded.height(), MODEL_INPUT_SIZE);
        assert!(matches!(decoded, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn undecodable_bytes_are_a_client_error() {
        let err = preprocess_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn base_url_is_trimmed_and_checked() {
        assert_eq!(
            normalize_base_url(" https://abc.ngrok-free.app// ").unwrap(),
            "https://abc.ngrok-free.app"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8000").unwrap(),
            "http://127.0.0.1:8000"
        );
        assert!(normalize_base_url("ftp://host").is_err());
        assert!(normalize_base_url("https://").is_err());
        assert!(normalize_base_url("abc.ngrok.app").is_err());
    }
}

//! HTTP tests for the classifier proxy and its configuration.

mod common;

use std::io::Cursor;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use axum_test::multipart::{MultipartForm, Part};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::{json, Value};
use skinhealth_service_shared::test_utils::{test_state, test_state_with_classifier};

use common::{server, spawn_upstream};

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([180, 90, 60])))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn upload(filename: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes)
            .file_name(filename)
            .mime_type("image/png"),
    )
}

/// A classifier that echoes what it received.
fn echo_classifier() -> Router {
    Router::new().route(
        "/predict",
        post(|mut multipart: Multipart| async move {
            let field = multipart.next_field().await.unwrap().unwrap();
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            Json(json!({
                "predicted_class": "eczema",
                "confidence": 0.91,
                "field": name,
                "filename": filename,
                "content_type": content_type,
                "width": decoded.width(),
                "height": decoded.height(),
            }))
        }),
    )
}

#[tokio::test]
async fn config_round_trip() {
    let server = server(test_state());

    let body: Value = server.get("/api/ml-model/config").await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["configured"], false);
    assert_eq!(body["ngrok_url"], Value::Null);

    let response = server
        .post("/api/ml-model/config")
        .json(&json!({"ngrok_url": "https://1dd0-34-75.ngrok-free.app//"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["configured"], true);
    assert_eq!(body["ngrok_url"], "https://1dd0-34-75.ngrok-free.app");

    let body: Value = server.get("/api/ml-model/config").await.json();
    assert_eq!(body["configured"], true);
    assert_eq!(body["ngrok_url"], "https://1dd0-34-75.ngrok-free.app");
}

#[tokio::test]
async fn config_rejects_bad_urls() {
    let server = server(test_state());

    let response = server
        .post("/api/ml-model/config")
        .json(&json!({"ngrok_url": "  "}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "ngrok_url is required");

    let response = server
        .post("/api/ml-model/config")
        .json(&json!({"ngrok_url": "ftp://model.local"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid URL format"));

    let body: Value = server.get("/api/ml-model/config").await.json();
    assert_eq!(body["configured"], false);
}

#[tokio::test]
async fn predict_requires_a_file() {
    let server = server(test_state());

    let response = server.post("/api/predict").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No file provided");

    let response = server
        .post("/api/predict")
        .multipart(MultipartForm::new().add_text("note", "no image here"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No file provided");

    let response = server
        .post("/api/predict")
        .multipart(MultipartForm::new().add_part("file", Part::bytes(png(4, 4))))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "No file selected");
}

#[tokio::test]
async fn predict_validates_uploads() {
    let server = server(test_state_with_classifier("http://127.0.0.1:9"));

    let response = server
        .post("/api/predict")
        .multipart(upload("notes.txt", b"hello".to_vec()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .starts_with("File type not allowed"));

    let response = server
        .post("/api/predict")
        .multipart(upload("lesion.png", b"not really a png".to_vec()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid image file"));
}

#[tokio::test]
async fn predict_without_classifier_is_503() {
    let response = server(test_state())
        .post("/api/predict")
        .multipart(upload("lesion.png", png(32, 32)))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn predict_forwards_normalized_jpeg() {
    let base = spawn_upstream(echo_classifier()).await;
    let server = server(test_state());
    server
        .post("/api/ml-model/config")
        .json(&json!({"ngrok_url": format!("{base}/")}))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/predict")
        .multipart(upload("Lesion.JPEG", png(300, 120)))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let prediction = &body["prediction"];
    assert_eq!(prediction["predicted_class"], "eczema");
    assert_eq!(prediction["field"], "file");
    assert_eq!(prediction["filename"], "image.jpg");
    assert_eq!(prediction["content_type"], "image/jpeg");
    assert_eq!(prediction["width"], 224);
    assert_eq!(prediction["height"], 224);
}

#[tokio::test]
async fn classifier_failure_is_502() {
    let failing = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
    );
    let base = spawn_upstream(failing).await;

    let response = server(test_state_with_classifier(&base))
        .post("/api/predict")
        .multipart(upload("lesion.png", png(16, 16)))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test(flavor = "current_thread")]
async fn large_upload_is_resized_off_the_request_task() {
    let base = spawn_upstream(echo_classifier()).await;
    let server = server(test_state_with_classifier(&base));

    let response = server
        .post("/api/predict")
        .multipart(upload("lesion.png", png(2400, 1800)))
        .await;
    response.assert_status_ok();

    let prediction = &response.json::<Value>()["prediction"];
    assert_eq!(prediction["width"], 224);
    assert_eq!(prediction["height"], 224);

    server.get("/api/health").await.assert_status_ok();
}

//! `model`: configure and exercise the backend's classifier proxy.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use skinhealth_cli::backend::BackendClient;
use skinhealth_cli::output::{render_json, yes_no};
use skinhealth_cli::terminal::ColorPalette;

pub fn handle_configure(client: &BackendClient, ngrok_url: &str) -> Result<()> {
    let body = client.configure_model(ngrok_url)?;
    println!(
        "Classifier URL configured: {}",
        body["ngrok_url"].as_str().unwrap_or(ngrok_url)
    );
    Ok(())
}

pub fn handle_status(client: &BackendClient, palette: &ColorPalette) -> Result<()> {
    let body = client.model_status()?;
    let configured = body["configured"].as_bool().unwrap_or(false);
    println!("Backend: {}", client.base_url());
    println!(
        "Configured: {}{}{}",
        palette.status(configured),
        yes_no(configured),
        palette.reset
    );
    println!("URL: {}", body["ngrok_url"].as_str().unwrap_or("not set"));
    if let Some(message) = body["message"].as_str() {
        println!("Message: {}", message);
    }
    Ok(())
}

pub fn handle_predict(client: &BackendClient, image: &Path) -> Result<()> {
    let body = client.predict(image)?;
    let prediction = body.get("prediction").cloned().unwrap_or(Value::Null);
    print!("{}", render_json(&prediction)?);
    Ok(())
}

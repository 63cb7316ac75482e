//! `chat`: chatbot diagnostics against a running backend.

use anyhow::{Context, Result};

use skinhealth_cli::backend::BackendClient;
use skinhealth_cli::output::{render_json, render_models, yes_no, OutputFormat};
use skinhealth_cli::terminal::ColorPalette;
use skinhealth_lib::ModelInfo;

pub fn handle_test(client: &BackendClient, palette: &ColorPalette) -> Result<()> {
    let body = client.chat_test()?;
    let configured = body["api_key_configured"].as_bool().unwrap_or(false);
    println!(
        "Test message: {}",
        body["test_message"].as_str().unwrap_or_default()
    );
    println!(
        "API key configured: {}{}{}",
        palette.status(configured),
        yes_no(configured),
        palette.reset
    );
    println!("Response: {}", body["response"].as_str().unwrap_or_default());
    Ok(())
}

pub fn handle_models(
    client: &BackendClient,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let body = client.chat_models()?;
    let models: Vec<ModelInfo> = serde_json::from_value(body["models"].clone())
        .context("backend returned an unexpected model list")?;
    let text = match format {
        OutputFormat::Table => render_models(&models, palette),
        OutputFormat::Json => render_json(&models)?,
    };
    print!("{}", text);
    Ok(())
}

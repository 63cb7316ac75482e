//! `nearby`: run the hospital locator in-process.

use anyhow::{Context, Result};

use skinhealth_cli::output::{render_hospitals, render_json, OutputFormat};
use skinhealth_cli::terminal::ColorPalette;
use skinhealth_lib::{Coordinate, HospitalLocator, ProviderConfig, SearchRequest};

pub fn handle_nearby(
    lat: f64,
    lng: f64,
    radius_meters: u32,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let config = ProviderConfig::from_env();
    let locator = HospitalLocator::new(&config).context("failed to build provider clients")?;
    let request = SearchRequest::new(Coordinate::new(lat, lng), radius_meters);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let outcome = runtime.block_on(locator.locate(request));

    let text = match format {
        OutputFormat::Table => render_hospitals(&outcome, palette),
        OutputFormat::Json => render_json(&outcome.records)?,
    };
    print!("{}", text);
    Ok(())
}

//! Rendering of command results.

use std::fmt::Write as _;

use serde::Serialize;
use skinhealth_lib::{HospitalRecord, LocatorOutcome, ModelInfo};

use crate::terminal::ColorPalette;

const NAME_WIDTH: usize = 38;

/// Output format for commands that print structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Table of located hospitals, nearest first.
pub fn render_hospitals(outcome: &LocatorOutcome, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();

    if outcome.records.is_empty() {
        out.push_str("No hospitals found in the specified area.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{}Found {} hospitals{} {}(search tier: {}){}",
        p.bold,
        outcome.records.len(),
        p.reset,
        p.gray,
        outcome.search_tier.unwrap_or("none"),
        p.reset
    );
    let _ = writeln!(
        out,
        "{:>2}  {:<width$}  {:>9}  {:>10}  {:>6}  {}",
        "#",
        "Name",
        "Distance",
        "Duration",
        "Rating",
        "Source",
        width = NAME_WIDTH
    );
    for (index, record) in outcome.records.iter().enumerate() {
        let _ = writeln!(out, "{}", hospital_row(index + 1, record, p));
    }
    if outcome.is_degraded() {
        let _ = writeln!(
            out,
            "{}Demo data: no places provider answered.{}",
            p.yellow, p.reset
        );
    }
    out
}

fn hospital_row(position: usize, record: &HospitalRecord, p: &ColorPalette) -> String {
    let distance = record.distance_text.as_deref().unwrap_or("N/A");
    let duration = record.duration_text.as_deref().unwrap_or("N/A");
    let source = record
        .distance_source
        .map(|s| s.as_str())
        .unwrap_or("-");
    format!(
        "{:>2}  {:<width$}  {}{:>9}{}  {:>10}  {:>6.1}  {}{}{}",
        position,
        truncate(&record.name, NAME_WIDTH),
        p.green,
        distance,
        p.reset,
        duration,
        record.rating,
        p.gray,
        source,
        p.reset,
        width = NAME_WIDTH
    )
}

/// Table of generator models.
pub fn render_models(models: &[ModelInfo], palette: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}Found {} available models{}",
        palette.bold,
        models.len(),
        palette.reset
    );
    for model in models {
        let _ = writeln!(
            out,
            "- {} ({}) [{}]",
            model.name,
            model.display_name,
            model.supported_generation_methods.join(", ")
        );
    }
    out
}

/// Pretty JSON with a trailing newline.
pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

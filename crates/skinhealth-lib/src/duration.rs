//! Human-readable travel durations.

/// Marker returned when a duration cannot be interpreted.
pub const UNKNOWN_DURATION: &str = "N/A";

/// Average urban driving speed used by the local estimate, km/h.
pub const URBAN_SPEED_KMH: f64 = 25.0;

/// Format a provider duration such as `"754s"` for display.
///
/// Anything other than a non-negative integer count of seconds (with an
/// optional trailing `s`) yields [`UNKNOWN_DURATION`].
pub fn format_duration(raw: &str) -> String {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('s').unwrap_or(trimmed).trim();
    match digits.parse::<u64>() {
        Ok(seconds) => format_seconds(seconds),
        Err(_) => UNKNOWN_DURATION.to_string(),
    }
}

/// Format a number of seconds for display.
pub fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds} sec");
    }

    if seconds < 3600 {
        let minutes = seconds / 60;
        let remainder = seconds % 60;
        return if remainder > 0 {
            format!("{minutes}m {remainder}s")
        } else {
            format!("{minutes} min")
        };
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if minutes > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{hours} hour")
    }
}

/// Estimated whole minutes to drive `driving_km` at [`URBAN_SPEED_KMH`].
pub fn estimate_minutes(driving_km: f64) -> u64 {
    let minutes = (driving_km / URBAN_SPEED_KMH * 60.0).round();
    if minutes.is_finite() && minutes > 0.0 {
        minutes as u64
    } else {
        0
    }
}

/// Display text for the local driving-time estimate.
pub fn estimate_duration_text(driving_km: f64) -> String {
    match estimate_minutes(driving_km) {
        0 => "< 1 min".to_string(),
        minutes => format!("{minutes} mins"),
    }
}

//! Resolution quality, confidence and resolution time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Resolutions of this many characters or more score full quality.
pub const FULL_QUALITY_LENGTH: f64 = 400.0;

/// Rounds to two decimals, exact ties to even (`0.125` gives `0.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `min(chars / 400, 1.0)`, rounded to two decimals.
pub fn score_resolution_quality(resolution: &str) -> f64 {
    let length = resolution.chars().count() as f64;
    round2((length / FULL_QUALITY_LENGTH).min(1.0))
}

/// Baseline 0.5, plus up to 0.4 for quality, plus up to 0.5 for corroborating
/// similar tickets, capped at 1.0.
pub fn calculate_confidence(resolution_quality: f64, similar_count: usize) -> f64 {
    let similarity_boost = (similar_count as f64 / 10.0).min(0.5);
    round2((0.5 + resolution_quality * 0.4 + similarity_boost).min(1.0))
}

/// Parses the timestamp shapes seen in ticket exports. Naive values are taken
/// as UTC; a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Hours from `created` to `resolved`, never negative. Missing or unparseable
/// timestamps give 0.
pub fn resolution_time_hours(created: Option<&str>, resolved: Option<&str>) -> f64 {
    let (Some(created), Some(resolved)) = (
        created.and_then(parse_timestamp),
        resolved.and_then(parse_timestamp),
    ) else {
        debug!(?created, ?resolved, "Missing or malformed dates, resolution time is 0");
        return 0.0;
    };
    let seconds = (resolved - created).num_seconds() as f64;
    (seconds / 3600.0).max(0.0)
}

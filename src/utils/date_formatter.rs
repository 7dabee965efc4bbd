use chrono::{DateTime, TimeZone, Utc};

use crate::data_types::XAxisKind;

fn to_datetime(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    let secs = ts.floor() as i64;
    let nanos = ((ts - ts.floor()) * 1e9) as u32;
    match Utc.timestamp_opt(secs, nanos) {
        chrono::LocalResult::Single(d) => Some(d),
        chrono::LocalResult::Ambiguous(d, _) => Some(d),
        chrono::LocalResult::None => None,
    }
}

fn format_with(ts: f64, pattern: &str) -> String {
    match to_datetime(ts) {
        Some(dt) => dt.format(pattern).to_string(),
        None => format!("{ts:.2}"),
    }
}

/// `2024-01-31`
pub fn format_date(ts: f64) -> String {
    format_with(ts, "%Y-%m-%d")
}

/// `13:45:00`
pub fn format_time(ts: f64) -> String {
    format_with(ts, "%H:%M:%S")
}

/// `2024-01-31 13:45:00`
pub fn format_datetime(ts: f64) -> String {
    format_with(ts, "%Y-%m-%d %H:%M:%S")
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Rounded value as text, always with a fractional part when `decimals > 0`
/// so labels can be right-padded with zeros.
pub fn format_rounded(value: f64, decimals: u32) -> String {
    if decimals == 0 {
        return format!("{value:.0}");
    }
    let s = round_to(value, decimals).to_string();
    if s.contains('.') || !value.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

/// Label for an X key.
pub fn format_key(key: f64, axis: XAxisKind, decimals: u32) -> String {
    match axis {
        XAxisKind::Datetime => format_datetime(key),
        XAxisKind::Numeric => format_rounded(key, decimals),
    }
}

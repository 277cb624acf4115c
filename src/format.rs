//! Formatting helpers for durations, dates, view counts and byte sizes.

use std::time::Duration;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Formats a video length as `MM:SS`, or `HH:MM:SS` from one hour up.
///
/// # Errors
///
/// Returns [`Error::InvalidDuration`] when `seconds` is zero or negative.
pub fn format_duration(seconds: i64) -> Result<String> {
    if seconds <= 0 {
        return Err(Error::InvalidDuration(seconds));
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours == 0 {
        Ok(format!("{minutes:02}:{secs:02}"))
    } else {
        Ok(format!("{hours:02}:{minutes:02}:{secs:02}"))
    }
}

/// Formats a publish date as `DD/MM/YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Cuts `title` to `max` characters, appending `...` when something was cut.
#[must_use]
pub fn truncate_title(title: &str, max: usize) -> String {
    match title.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}

/// Formats a view count with `.` as the thousands separator.
#[must_use]
pub fn format_views(views: u64) -> String {
    let digits = views.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Formats a byte count as a human-readable string (B, KB, MB, GB).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Formats wall-clock time spent as e.g. "5.0s", "1m 05s", "1h 01m 05s".
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!(
            "{}h {:02}m {:02}s",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}.{:01}s", secs, d.subsec_millis() / 100)
    }
}

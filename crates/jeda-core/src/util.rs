//! Shared utility functions used across multiple modules.

use reqwest::StatusCode;
use serde::Deserialize;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Lowercase `value` and join its words with dashes (`"Brick Red"` -> `"brick-red"`).
///
/// camelCase boundaries also split words, so `"pomodoroTime"` becomes
/// `"pomodoro-time"`.
pub fn to_slug(value: &str) -> String {
    let mut slug = String::with_capacity(value.len() + 4);
    let mut previous_lower = false;
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() && previous_lower {
                slug.push('-');
            }
            previous_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            slug.push(ch.to_ascii_lowercase());
        } else {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
            previous_lower = false;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Build a human-readable message from a failed API response body.
pub fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

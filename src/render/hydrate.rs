//! Best-effort re-hydration of already stringified values for display.

use serde_json::Value as Json;

/// Parse a JSON-looking string back into a structured value.
///
/// Anything that does not look like JSON, or fails to parse, comes back as
/// the original string unchanged.
pub fn smart_parse(s: &str) -> Json {
    let raw = || Json::String(s.to_string());

    let trimmed = s.trim();
    let (Some(first), Some(last)) = (trimmed.chars().next(), trimmed.chars().last()) else {
        return raw();
    };

    let looks_json = (first == '{' && last == '}')
        || (first == '[' && last == ']')
        || first == '"'
        || first == '\''
        || first == '-'
        || first.is_ascii_digit();
    if !looks_json {
        return raw();
    }

    if first == '\'' && last == '\'' && trimmed.len() >= 2 {
        let inner = &trimmed[1..trimmed.len() - 1];
        let candidate = format!("\"{}\"", inner.replace('"', "\\\""));
        return serde_json::from_str(&candidate).unwrap_or_else(|_| raw());
    }

    serde_json::from_str(trimmed).unwrap_or_else(|_| raw())
}

/// Display form of a re-hydrated value: strings as-is, containers pretty.
pub fn display(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Object(_) | Json::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

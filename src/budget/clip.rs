//! Text clipping and size measurement.

use serde_json::Value;

/// Size of a value as the downstream consumer counts it: characters of compact
/// JSON with non-ASCII left unescaped.
pub fn json_chars(value: &Value) -> usize {
    // serde_json never escapes non-ASCII, so the compact form is what gets sent
    value.to_string().chars().count()
}

/// Clip `text` to at most `limit` characters, ending clipped text with `marker`.
pub fn clip_text(text: &str, limit: usize, marker: &str) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(marker.chars().count());
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str(marker);
    clipped
}

/// Clip an arbitrary JSON field value
///
/// Strings are clipped, numbers and booleans pass through, nested values are
/// flattened to their JSON text first. Null and empty values yield `None`.
pub fn clip_value(value: &Value, limit: usize, marker: &str) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Bool(_) | Value::Number(_) => Some(value.clone()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(Value::String(clip_text(s, limit, marker))),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(Value::String(clip_text(&other.to_string(), limit, marker))),
    }
}

//! CLI presentation: text and json formatters per command.

use crate::budget::{ITEMS_KEY, NOTE_KEY};
use crate::config::{ReelgateConfig, ValidationError};
use crate::error::PipelineError;
use crate::pipeline::GenerateResponse;
use serde_json::Value;

fn field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn format_generate_text(response: &GenerateResponse) -> String {
    let items: &[Value] = response
        .payload
        .get(ITEMS_KEY)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    if items.is_empty() {
        return format!(
            "No items could be produced (requested {}). Try a broader style hint.",
            response.requested
        );
    }

    let mut output = String::new();
    for (i, item) in items.iter().enumerate() {
        output.push_str(&format!(
            "{}) {}\n",
            i + 1,
            field(item, "movie").unwrap_or("(untitled)")
        ));
        for (label, key) in [("Scene", "scene"), ("Behind", "behind"), ("Vibe", "vibe_point")] {
            if let Some(text) = field(item, key) {
                output.push_str(&format!("   {}: {}\n", label, text));
            }
        }
        output.push('\n');
    }

    if response.truncated {
        if let Some(note) = field(&response.payload, NOTE_KEY) {
            output.push_str(&format!("Note: {}\n", note));
        }
    }
    if response.is_short() {
        output.push_str(&format!(
            "Only {} of {} requested items could be produced.\n",
            response.count, response.requested
        ));
    }

    output.trim_end().to_string()
}

/// Compact JSON, exactly as measured by the budget
pub fn format_generate_json(response: &GenerateResponse) -> String {
    response.payload.to_string()
}

pub fn format_config_show(config: &ReelgateConfig) -> Result<String, PipelineError> {
    config
        .to_toml()
        .map_err(|e| PipelineError::ConfigError(format!("Failed to render configuration: {}", e)))
}

pub fn format_config_validation(result: &Result<(), Vec<ValidationError>>) -> String {
    match result {
        Ok(()) => "Configuration is valid".to_string(),
        Err(errors) => {
            let mut output = format!("Configuration has {} problem(s):\n", errors.len());
            for error in errors {
                output.push_str(&format!("  - {}\n", error));
            }
            output.trim_end().to_string()
        }
    }
}

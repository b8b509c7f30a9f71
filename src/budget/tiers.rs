//! Budget tiers: pure `(response) -> response` stages, each more aggressive
//! than the last. Every stage is idempotent and none of them ever adds content
//! back once removed.

use super::clip::clip_value;
use super::{response_chars, BudgetConfig};
use serde_json::{Map, Value};

/// A single cascade stage
pub type Stage = fn(Map<String, Value>, &BudgetConfig) -> Map<String, Value>;

pub const ITEMS_KEY: &str = "items";
pub const COUNT_KEY: &str = "count";
pub const TRUNCATED_KEY: &str = "truncated";
pub const NOTE_KEY: &str = "note";

const TITLE: &str = "movie";
const ALT_TITLE: &str = "title";
const ALIASES: &str = "aliases";

/// Fields kept by the minimization tier, in output order
const MINIMAL_FIELDS: [&str; 4] = [TITLE, "year", "vibe_point", "reason"];
/// Rationale-like fields that get the roomier minimal limit
const RATIONALE_FIELDS: [&str; 2] = ["vibe_point", "reason"];

fn as_fields(item: Value) -> Map<String, Value> {
    match item {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        Value::String(title) => {
            let mut fields = Map::new();
            fields.insert(TITLE.to_string(), Value::String(title));
            fields
        }
        other => {
            let mut fields = Map::new();
            fields.insert(TITLE.to_string(), Value::String(other.to_string()));
            fields
        }
    }
}

fn map_items<F>(mut response: Map<String, Value>, mut f: F) -> Map<String, Value>
where
    F: FnMut(Value) -> Value,
{
    if let Some(Value::Array(items)) = response.get_mut(ITEMS_KEY) {
        *items = std::mem::take(items).into_iter().map(&mut f).collect();
    }
    response
}

fn title_of<'a>(fields: &'a Map<String, Value>) -> Option<&'a Value> {
    [TITLE, ALT_TITLE]
        .into_iter()
        .filter_map(|key| fields.get(key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

fn clip_aliases(value: &Value, config: &BudgetConfig) -> Option<Value> {
    let limit = config.limit_for(ALIASES);
    match value {
        Value::Array(aliases) => {
            let joined = aliases
                .iter()
                .take(config.alias_max_count)
                .filter_map(|alias| clip_value(alias, config.alias_item_limit, &config.marker))
                .map(|alias| match alias {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            clip_value(&Value::String(joined), limit, &config.marker)
        }
        other => clip_value(other, limit, &config.marker),
    }
}

fn clip_item_fields(item: Value, config: &BudgetConfig) -> Value {
    let source = as_fields(item);
    let mut out = Map::new();

    for (key, &limit) in &config.field_limits {
        let Some(value) = source.get(key) else {
            continue;
        };
        let clipped = if key == ALIASES {
            clip_aliases(value, config)
        } else {
            clip_value(value, limit, &config.marker)
        };
        if let Some(clipped) = clipped {
            out.insert(key.clone(), clipped);
        }
    }

    if !out.contains_key(TITLE) {
        if let Some(title) = title_of(&source)
            .and_then(|t| clip_value(t, config.limit_for(TITLE), &config.marker))
        {
            out.insert(TITLE.to_string(), title);
        }
    }

    Value::Object(out)
}

/// Tier 0: keep whitelisted fields, each clipped to its own limit.
pub fn clip_fields(response: Map<String, Value>, config: &BudgetConfig) -> Map<String, Value> {
    map_items(response, |item| clip_item_fields(item, config))
}

fn minimize_item(item: Value, config: &BudgetConfig) -> Value {
    let source = as_fields(item);
    let mut out = Map::new();

    for key in MINIMAL_FIELDS {
        let value = if key == TITLE {
            title_of(&source)
        } else {
            source.get(key)
        };
        let limit = if RATIONALE_FIELDS.contains(&key) {
            config.minimal_rationale_limit
        } else {
            config.minimal_limit
        };
        if let Some(clipped) = value.and_then(|v| clip_value(v, limit, &config.marker)) {
            out.insert(key.to_string(), clipped);
        }
    }

    Value::Object(out)
}

/// Tier 1: title, year and one rationale per item, with tighter limits.
pub fn minimize(response: Map<String, Value>, config: &BudgetConfig) -> Map<String, Value> {
    map_items(response, |item| minimize_item(item, config))
}

fn floor_item(item: Value, config: &BudgetConfig) -> Value {
    let fields = as_fields(item)
        .into_iter()
        .filter_map(|(key, value)| {
            let limit = if key == TITLE {
                config.floor_title_limit
            } else {
                config.floor_limit
            };
            clip_value(&value, limit, &config.marker).map(|clipped| (key, clipped))
        })
        .collect();
    Value::Object(fields)
}

fn collapse_items(response: &mut Map<String, Value>, config: &BudgetConfig) {
    let Some(Value::Array(items)) = response.get_mut(ITEMS_KEY) else {
        return;
    };
    let collapsed: Vec<Value> = std::mem::take(items)
        .into_iter()
        .take(config.floor_max_items)
        .filter_map(|item| {
            let fields = as_fields(item);
            let title = title_of(&fields)
                .and_then(|t| clip_value(t, config.floor_title_limit, &config.marker))?;
            let mut out = Map::new();
            out.insert(TITLE.to_string(), title);
            Some(Value::Object(out))
        })
        .collect();

    let count = collapsed.len();
    *items = collapsed;
    if response.contains_key(COUNT_KEY) {
        response.insert(COUNT_KEY.to_string(), Value::from(count));
    }
}

/// Tier 2: clip everything hard, drop noisy top-level keys, and as a last
/// resort collapse to a short title-only list flagged as truncated.
pub fn hard_floor(response: Map<String, Value>, config: &BudgetConfig) -> Map<String, Value> {
    let mut response = map_items(response, |item| floor_item(item, config));

    for noisy in &config.noisy_keys {
        response.remove(noisy);
    }

    if response_chars(&response) > config.max_response_chars {
        collapse_items(&mut response, config);
        response.insert(TRUNCATED_KEY.to_string(), Value::Bool(true));
        response.insert(
            NOTE_KEY.to_string(),
            Value::String(config.truncation_note.clone()),
        );
    }

    response
}

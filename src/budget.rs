//! Response Budget
//!
//! Guarantees the serialized response stays under a fixed character ceiling by
//! running it through an ordered cascade of increasingly lossy stages. Field
//! clipping always runs; each later stage runs only while the response is still
//! over budget. The cascade never re-expands content it has removed.

pub mod clip;
pub mod tiers;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

pub use clip::{clip_text, json_chars};
pub use tiers::{Stage, COUNT_KEY, ITEMS_KEY, NOTE_KEY, TRUNCATED_KEY};

/// Limit used for whitelisted fields with no explicit entry
pub const DEFAULT_FIELD_LIMIT: usize = 160;

/// Budget configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Hard ceiling on the serialized response, in characters
    #[serde(default = "default_max_response_chars")]
    pub max_response_chars: usize,

    /// Field whitelist for the clipping tier, with per-field limits
    #[serde(default = "default_field_limits")]
    pub field_limits: BTreeMap<String, usize>,

    /// Aliases kept when an alias list is flattened
    #[serde(default = "default_alias_max_count")]
    pub alias_max_count: usize,

    /// Per-alias limit when flattening
    #[serde(default = "default_alias_item_limit")]
    pub alias_item_limit: usize,

    /// Minimization tier limit for title and year
    #[serde(default = "default_minimal_limit")]
    pub minimal_limit: usize,

    /// Minimization tier limit for rationale fields
    #[serde(default = "default_minimal_rationale_limit")]
    pub minimal_rationale_limit: usize,

    /// Hard-floor limit for every non-title field
    #[serde(default = "default_floor_limit")]
    pub floor_limit: usize,

    /// Hard-floor limit for the title
    #[serde(default = "default_floor_title_limit")]
    pub floor_title_limit: usize,

    /// Items kept when the hard floor collapses the list
    #[serde(default = "default_floor_max_items")]
    pub floor_max_items: usize,

    /// Top-level keys dropped by the hard floor
    #[serde(default = "default_noisy_keys")]
    pub noisy_keys: Vec<String>,

    /// Appended to clipped text; counts toward the limit
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Explanation attached to a collapsed response
    #[serde(default = "default_truncation_note")]
    pub truncation_note: String,
}

fn default_max_response_chars() -> usize {
    90_000
}

fn default_field_limits() -> BTreeMap<String, usize> {
    [
        ("movie", 80),
        ("title", 80),
        ("year", 6),
        ("scene", 160),
        ("behind", 180),
        ("vibe_point", 160),
        ("reason", 180),
        ("why", 180),
        ("notes", 180),
        ("aliases", 220),
    ]
    .into_iter()
    .map(|(field, limit)| (field.to_string(), limit))
    .collect()
}

fn default_alias_max_count() -> usize {
    6
}

fn default_alias_item_limit() -> usize {
    30
}

fn default_minimal_limit() -> usize {
    80
}

fn default_minimal_rationale_limit() -> usize {
    120
}

fn default_floor_limit() -> usize {
    60
}

fn default_floor_title_limit() -> usize {
    70
}

fn default_floor_max_items() -> usize {
    10
}

fn default_noisy_keys() -> Vec<String> {
    ["debug", "raw", "candidates", "forbidden_hits", "logs"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_marker() -> String {
    "…".to_string()
}

fn default_truncation_note() -> String {
    "Response compacted to fit payload limits.".to_string()
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_response_chars: default_max_response_chars(),
            field_limits: default_field_limits(),
            alias_max_count: default_alias_max_count(),
            alias_item_limit: default_alias_item_limit(),
            minimal_limit: default_minimal_limit(),
            minimal_rationale_limit: default_minimal_rationale_limit(),
            floor_limit: default_floor_limit(),
            floor_title_limit: default_floor_title_limit(),
            floor_max_items: default_floor_max_items(),
            noisy_keys: default_noisy_keys(),
            marker: default_marker(),
            truncation_note: default_truncation_note(),
        }
    }
}

impl BudgetConfig {
    pub fn limit_for(&self, field: &str) -> usize {
        self.field_limits
            .get(field)
            .copied()
            .unwrap_or(DEFAULT_FIELD_LIMIT)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_response_chars == 0 {
            return Err("max_response_chars must be greater than zero".to_string());
        }
        if !self.field_limits.contains_key("movie") {
            return Err("field_limits must include `movie`".to_string());
        }
        let marker_len = self.marker.chars().count();
        let smallest = [
            self.minimal_limit,
            self.minimal_rationale_limit,
            self.floor_limit,
            self.floor_title_limit,
            self.alias_item_limit,
        ]
        .into_iter()
        .chain(self.field_limits.values().copied())
        .min()
        .unwrap_or(0);
        if smallest <= marker_len {
            return Err(format!(
                "every field limit must exceed the marker length ({}), smallest is {}",
                marker_len, smallest
            ));
        }
        Ok(())
    }
}

/// Cascade stage reached while enforcing the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    FieldClip,
    Minimal,
    HardFloor,
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BudgetTier::FieldClip => "field_clip",
            BudgetTier::Minimal => "minimal",
            BudgetTier::HardFloor => "hard_floor",
        };
        f.write_str(name)
    }
}

/// Ordered cascade; the first stage always runs
const CASCADE: [(BudgetTier, Stage); 3] = [
    (BudgetTier::FieldClip, tiers::clip_fields),
    (BudgetTier::Minimal, tiers::minimize),
    (BudgetTier::HardFloor, tiers::hard_floor),
];

/// Outcome of budget enforcement
#[derive(Debug, Clone, PartialEq)]
pub struct Enforced {
    pub response: Map<String, Value>,
    /// Most aggressive stage applied
    pub tier: BudgetTier,
    /// Items were collapsed to titles only
    pub truncated: bool,
    /// Final serialized size in characters
    pub chars: usize,
}

/// Serialized size of a response object
pub fn response_chars(response: &Map<String, Value>) -> usize {
    serde_json::to_string(response)
        .map(|s| s.chars().count())
        .unwrap_or(usize::MAX)
}

/// Run the cascade until the response fits
pub fn enforce(response: Map<String, Value>, config: &BudgetConfig) -> Enforced {
    let mut current = response;
    let mut reached = BudgetTier::FieldClip;

    for (index, (tier, stage)) in CASCADE.iter().enumerate() {
        if index > 0 && response_chars(&current) <= config.max_response_chars {
            break;
        }
        current = stage(current, config);
        reached = *tier;
        debug!(tier = %tier, chars = response_chars(&current), "Applied budget stage");
    }

    let chars = response_chars(&current);
    if chars > config.max_response_chars {
        warn!(
            chars,
            max = config.max_response_chars,
            "Response still over budget after the hard floor"
        );
    }

    let truncated = matches!(current.get(TRUNCATED_KEY), Some(Value::Bool(true)));
    Enforced {
        response: current,
        tier: reached,
        truncated,
        chars,
    }
}

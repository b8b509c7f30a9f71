//! Budget cascade behavior on realistic payloads

use reelgate::budget::{enforce, response_chars, BudgetConfig, BudgetTier};
use serde_json::{json, Map, Value};

fn payload(items: usize, filler: usize) -> Map<String, Value> {
    let items: Vec<Value> = (0..items)
        .map(|i| {
            json!({
                "movie": format!("영화 {}", i),
                "aliases": ["한국어 제목", "Alt Title", "Another", "Fourth", "Fifth", "Sixth", "Seventh"],
                "scene": "장".repeat(filler),
                "behind": "면".repeat(filler),
                "vibe_point": "감".repeat(filler),
                "internal_score": 0.5,
            })
        })
        .collect();
    match json!({"items": items, "count": items.len(), "requested": 10, "debug": {"trace": "x".repeat(filler)}}) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn test_characters_not_bytes_are_budgeted() {
    let config = BudgetConfig {
        max_response_chars: 5_000,
        ..BudgetConfig::default()
    };
    let out = enforce(payload(6, 150), &config);
    assert!(out.chars <= 5_000);
    assert_eq!(out.chars, response_chars(&out.response));
    // Hangul is 3 bytes per char in UTF-8; a byte budget would have forced a deeper tier
    assert_eq!(out.tier, BudgetTier::FieldClip);
}

#[test]
fn test_unknown_fields_dropped_and_aliases_flattened() {
    let out = enforce(payload(1, 10), &BudgetConfig::default());
    let item = &out.response["items"][0];
    assert!(item.get("internal_score").is_none());
    assert_eq!(
        item["aliases"],
        "한국어 제목, Alt Title, Another, Fourth, Fifth, Sixth"
    );
    // Top-level keys survive until the hard floor
    assert!(out.response.contains_key("debug"));
}

#[test]
fn test_every_tier_is_reachable_and_ordered() {
    let mut reached = Vec::new();
    for max in [1_000_000, 8_000, 3_000, 500] {
        let config = BudgetConfig {
            max_response_chars: max,
            ..BudgetConfig::default()
        };
        let out = enforce(payload(10, 200), &config);
        if max >= 3_000 {
            assert!(out.chars <= max, "max={} chars={}", max, out.chars);
        }
        reached.push(out.tier);
    }
    let mut sorted = reached.clone();
    sorted.sort();
    assert_eq!(reached, sorted);
    assert_eq!(reached.first(), Some(&BudgetTier::FieldClip));
    assert_eq!(reached.last(), Some(&BudgetTier::HardFloor));
}

#[test]
fn test_hard_floor_drops_noise_and_flags_truncation() {
    let config = BudgetConfig {
        max_response_chars: 500,
        ..BudgetConfig::default()
    };
    let out = enforce(payload(30, 300), &config);
    assert!(out.truncated);
    assert!(!out.response.contains_key("debug"));
    assert_eq!(out.response["count"], 10);
    assert_eq!(out.response["requested"], 10);
    assert!(out.chars <= 500);
}

//! Coarse and strict denylist matching.
//!
//! The two modes are deliberately separate functions: the coarse check is
//! threshold-based and literal, the strict check is set membership over
//! normalized titles and aliases.

use crate::title::{normalize, TitleKey};
use crate::types::{Candidate, DenylistEntry, FinalItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key overlap required before a title collision counts as a near-duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// Minimum shared scene keys
    #[serde(default = "default_scene_min")]
    pub scene_min: usize,

    /// Minimum shared trick keys
    #[serde(default = "default_trick_min")]
    pub trick_min: usize,
}

fn default_scene_min() -> usize {
    2
}

fn default_trick_min() -> usize {
    1
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            scene_min: default_scene_min(),
            trick_min: default_trick_min(),
        }
    }
}

fn literal_title(text: &str) -> String {
    text.trim().to_lowercase()
}

fn overlap(keys: &HashSet<&str>, other: &[String]) -> usize {
    other
        .iter()
        .map(String::as_str)
        .collect::<HashSet<&str>>()
        .intersection(keys)
        .count()
}

/// Coarse check on a raw candidate
///
/// Forbidden iff some entry has the same trimmed, case-folded title (aliases are
/// not consulted) and the candidate shares at least `scene_min` scene keys and
/// `trick_min` trick keys with it. A title collision alone is not enough.
pub fn is_forbidden_candidate(
    candidate: &Candidate,
    entries: &[DenylistEntry],
    thresholds: MatchThresholds,
) -> bool {
    let title = literal_title(&candidate.movie);
    if title.is_empty() {
        return false;
    }

    let scene_keys: HashSet<&str> = candidate.scene_keys.iter().map(String::as_str).collect();
    let trick_keys: HashSet<&str> = candidate.trick_keys.iter().map(String::as_str).collect();

    entries.iter().any(|entry| {
        literal_title(&entry.movie) == title
            && overlap(&scene_keys, &entry.scene_keys) >= thresholds.scene_min
            && overlap(&trick_keys, &entry.trick_keys) >= thresholds.trick_min
    })
}

/// Drop coarse-forbidden candidates, preserving order.
pub fn filter_candidates(
    candidates: Vec<Candidate>,
    entries: &[DenylistEntry],
    thresholds: MatchThresholds,
) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| !is_forbidden_candidate(c, entries, thresholds))
        .collect()
}

/// Normalized forbidden title set used by the strict matcher
#[derive(Debug, Clone, Default)]
pub struct ForbiddenTitles {
    keys: HashSet<TitleKey>,
}

impl ForbiddenTitles {
    /// Collect keys from every entry's title and every alias. Empty keys are skipped.
    pub fn from_entries(entries: &[DenylistEntry]) -> Self {
        let keys = entries
            .iter()
            .flat_map(|entry| std::iter::once(&entry.movie).chain(entry.aliases.iter()))
            .map(|title| normalize(title))
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }

    pub fn contains(&self, key: &TitleKey) -> bool {
        !key.is_empty() && self.keys.contains(key)
    }

    /// Strict check on a rendered item: title or any alias alone is sufficient.
    pub fn is_forbidden_item(&self, item: &FinalItem) -> bool {
        self.contains(&normalize(&item.movie))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Drop strictly forbidden items, preserving order.
pub fn filter_items(items: Vec<FinalItem>, forbidden: &ForbiddenTitles) -> Vec<FinalItem> {
    items
        .into_iter()
        .filter(|item| !forbidden.is_forbidden_item(item))
        .collect()
}

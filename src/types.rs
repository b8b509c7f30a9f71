//! Core records flowing through the pipeline.

use serde::{Deserialize, Serialize};

/// Raw generated idea, prior to rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub movie: String,
    #[serde(default)]
    pub scene_keys: Vec<String>,
    #[serde(default)]
    pub trick_keys: Vec<String>,
    #[serde(default, rename = "one_line_pitch", alias = "pitch")]
    pub pitch: String,
}

impl Candidate {
    pub fn new(movie: impl Into<String>, scene_keys: &[&str], trick_keys: &[&str]) -> Self {
        Self {
            movie: movie.into(),
            scene_keys: scene_keys.iter().map(|s| s.to_string()).collect(),
            trick_keys: trick_keys.iter().map(|s| s.to_string()).collect(),
            pitch: String::new(),
        }
    }
}

/// Forbidden title record.
///
/// Every collection defaults to empty when absent so a sparse entry can only
/// narrow what it matches, never widen it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenylistEntry {
    #[serde(default, alias = "fid")]
    pub id: String,
    #[serde(default)]
    pub movie: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub scene_keys: Vec<String>,
    #[serde(default)]
    pub trick_keys: Vec<String>,
}

/// Rendered, caller-facing item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalItem {
    #[serde(default)]
    pub movie: String,
    #[serde(default)]
    pub scene: String,
    #[serde(default)]
    pub behind: String,
    #[serde(default)]
    pub vibe_point: String,
}

impl FinalItem {
    pub fn titled(movie: impl Into<String>) -> Self {
        Self {
            movie: movie.into(),
            scene: String::new(),
            behind: String::new(),
            vibe_point: String::new(),
        }
    }
}

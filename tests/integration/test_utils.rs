//! Shared test utilities for integration tests
//!
//! Scripted generative capabilities plus environment isolation for tests that
//! load configuration from HOME / XDG_CONFIG_HOME.

use async_trait::async_trait;
use reelgate::error::PipelineError;
use reelgate::source::{CandidateSource, ItemRenderer};
use reelgate::types::{Candidate, DenylistEntry, FinalItem};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: [&str; 5] = [
    "HOME",
    "XDG_CONFIG_HOME",
    "REELGATE_ENV",
    "OPENAI_API_KEY",
    "REELGATE__PROVIDER__MODEL",
];

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir` and the
/// reelgate-related variables cleared; the original environment is restored after.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|name| (*name, std::env::var(name).ok()))
        .collect();

    for name in ISOLATED_VARS {
        std::env::remove_var(name);
    }
    let home = test_dir.path().join("home");
    let config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);

    let result = f(&config_home);

    for (name, value) in saved {
        match value {
            Some(value) => std::env::set_var(name, value),
            None => std::env::remove_var(name),
        }
    }
    result
}

pub fn entry(id: &str, movie: &str, aliases: &[&str], scene_keys: &[&str], trick_keys: &[&str]) -> DenylistEntry {
    DenylistEntry {
        id: id.to_string(),
        movie: movie.to_string(),
        aliases: aliases.iter().map(|s| s.to_string()).collect(),
        scene_keys: scene_keys.iter().map(|s| s.to_string()).collect(),
        trick_keys: trick_keys.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn titled(titles: &[&str]) -> Vec<Candidate> {
    titles.iter().map(|t| Candidate::new(*t, &[], &[])).collect()
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// Replays scripted batches in order, repeating the last one once exhausted
pub struct ScriptedSource {
    batches: Vec<Vec<Candidate>>,
    calls: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Vec<Candidate>>) -> Self {
        Self {
            batches,
            calls: Mutex::new(0),
        }
    }

    pub fn repeating(batch: Vec<Candidate>) -> Self {
        Self::new(vec![batch])
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CandidateSource for ScriptedSource {
    async fn generate(&self, _style_hint: &str, _count: usize) -> Result<Vec<Candidate>, PipelineError> {
        let mut calls = self.calls.lock().unwrap();
        let index = (*calls).min(self.batches.len().saturating_sub(1));
        *calls += 1;
        Ok(self.batches.get(index).cloned().unwrap_or_default())
    }
}

/// Renders each candidate into one item with fields of a configurable length
pub struct EchoRenderer {
    filler: usize,
    materials: Mutex<Vec<usize>>,
}

impl EchoRenderer {
    pub fn new() -> Self {
        Self::with_filler(12)
    }

    pub fn with_filler(filler: usize) -> Self {
        Self {
            filler,
            materials: Mutex::new(Vec::new()),
        }
    }

    pub fn materials(&self) -> Vec<usize> {
        self.materials.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemRenderer for EchoRenderer {
    async fn render(&self, candidates: &[Candidate], _k: usize) -> Result<Vec<FinalItem>, PipelineError> {
        self.materials.lock().unwrap().push(candidates.len());
        Ok(candidates
            .iter()
            .map(|c| FinalItem {
                movie: c.movie.clone(),
                scene: "s".repeat(self.filler),
                behind: "b".repeat(self.filler),
                vibe_point: "v".repeat(self.filler),
            })
            .collect())
    }
}

/// Always fails like an unreachable provider
pub struct UnreachableSource;

#[async_trait]
impl CandidateSource for UnreachableSource {
    async fn generate(&self, _style_hint: &str, _count: usize) -> Result<Vec<Candidate>, PipelineError> {
        Err(PipelineError::SourceUnavailable("connection refused".to_string()))
    }
}

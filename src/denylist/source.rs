//! Denylist sources: where forbidden entries are loaded from.
//!
//! Entries are loaded fresh for every pipeline run; nothing here caches.

use crate::error::DenylistError;
use crate::types::DenylistEntry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Denylist location configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DenylistConfig {
    /// JSON file holding a top-level array of entries
    #[serde(default = "default_denylist_path")]
    pub path: PathBuf,
}

fn default_denylist_path() -> PathBuf {
    PathBuf::from("forbidden.json")
}

impl Default for DenylistConfig {
    fn default() -> Self {
        Self {
            path: default_denylist_path(),
        }
    }
}

/// Read-only supplier of denylist entries
pub trait DenylistSource: Send + Sync {
    fn load(&self) -> Result<Vec<DenylistEntry>, DenylistError>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Denylist backed by a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileDenylist {
    path: PathBuf,
}

impl JsonFileDenylist {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve a relative path against the workspace root
    pub fn in_workspace(workspace_root: &Path, path: &Path) -> Self {
        if path.is_absolute() {
            Self::new(path)
        } else {
            Self::new(workspace_root.join(path))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DenylistSource for JsonFileDenylist {
    fn load(&self) -> Result<Vec<DenylistEntry>, DenylistError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DenylistError::NotFound(self.path.clone()),
            _ => DenylistError::from(e),
        })?;
        let entries: Vec<DenylistEntry> =
            serde_json::from_str(&raw).map_err(|e| DenylistError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        for (index, entry) in entries.iter().enumerate() {
            if entry.movie.trim().is_empty() {
                debug!(
                    index,
                    id = %entry.id,
                    "Denylist entry has no movie title; only its aliases can match"
                );
            }
        }

        info!(
            path = %self.path.display(),
            entries = entries.len(),
            "Loaded denylist"
        );
        Ok(entries)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory denylist, for embedding callers and tests
#[derive(Debug, Clone, Default)]
pub struct StaticDenylist {
    entries: Vec<DenylistEntry>,
}

impl StaticDenylist {
    pub fn new(entries: Vec<DenylistEntry>) -> Self {
        Self { entries }
    }
}

impl DenylistSource for StaticDenylist {
    fn load(&self) -> Result<Vec<DenylistEntry>, DenylistError> {
        Ok(self.entries.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} entries)", self.entries.len())
    }
}

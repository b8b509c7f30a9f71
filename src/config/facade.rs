//! Configuration loading entry points.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::ReelgateConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`ReelgateConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `config/config.toml`, workspace `config/{REELGATE_ENV}.toml`, environment.
    pub fn load(workspace_root: &Path) -> Result<ReelgateConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: ReelgateConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from one explicit file, still honoring environment overrides
    pub fn load_from_file(path: &Path) -> Result<ReelgateConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Message(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?.add_source(File::from(path));
        let builder = environment::add_to_builder(builder);

        let config: ReelgateConfig = builder.build()?.try_deserialize()?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Global configuration file location, if a home directory is known
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}

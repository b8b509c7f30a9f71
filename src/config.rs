//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global user file, then the
//! workspace files, then `REELGATE__SECTION__KEY` environment overrides. The
//! loaded structure is immutable and handed to each pipeline component.

use crate::denylist::DenylistConfig;
use crate::logging::LoggingConfig;
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};

pub use crate::provider::{ProviderConfig, ProviderType};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::{ENV_PREFIX, ENV_SEPARATOR};

/// Environment variable selecting `config/{env}.toml`
pub const ENV_NAME_VAR: &str = "REELGATE_ENV";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReelgateConfig {
    /// Model provider used for generation and rendering
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Denylist location
    #[serde(default)]
    pub denylist: DenylistConfig,

    /// Pool, composition and budget limits
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Provider(String),
    Denylist(String),
    Pipeline(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Denylist(msg) => write!(f, "Denylist: {}", msg),
            ValidationError::Pipeline(msg) => write!(f, "Pipeline: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ReelgateConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }

        if self.denylist.path.as_os_str().is_empty() {
            errors.push(ValidationError::Denylist(
                "Denylist path cannot be empty".to_string(),
            ));
        }

        if let Err(e) = self.pipeline.validate() {
            errors.push(ValidationError::Pipeline(e));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Effective configuration rendered as TOML; the API key is never included
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

//! CLI route: single route table and run context. Dispatches to the pipeline and presentation.

use crate::cli::command_name;
use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{
    format_config_show, format_config_validation, format_generate_json, format_generate_text,
};
use crate::config::{ConfigLoader, ReelgateConfig};
use crate::error::PipelineError;
use crate::pipeline::{GenerateRequest, Pipeline};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace and loaded configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: ReelgateConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, PipelineError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: ReelgateConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &ReelgateConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, PipelineError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = %name, "Executing command");

        let result = match command {
            Commands::Generate {
                style_hint,
                k,
                n,
                denylist,
                format,
            } => self.handle_generate(style_hint, *k, *n, denylist.clone(), format),
            Commands::Config { command } => self.handle_config(command),
        };

        info!(
            command = %name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_generate(
        &self,
        style_hint: &str,
        k: usize,
        n: usize,
        denylist: Option<PathBuf>,
        format: &str,
    ) -> Result<String, PipelineError> {
        if format != "text" && format != "json" {
            return Err(PipelineError::InvalidRequest(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                format
            )));
        }

        let request = GenerateRequest::new(style_hint).with_k(k).with_n(n);
        request.validate()?;

        self.config.validate().map_err(|errors| {
            PipelineError::ConfigError(format_config_validation(&Err(errors)))
        })?;

        let pipeline = Pipeline::from_config(&self.config, &self.workspace_root, denylist)?;

        let rt = tokio::runtime::Runtime::new().map_err(|e| {
            PipelineError::ConfigError(format!("Failed to start async runtime: {}", e))
        })?;
        let response = rt.block_on(pipeline.run(&request))?;

        Ok(if format == "json" {
            format_generate_json(&response)
        } else {
            format_generate_text(&response)
        })
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String, PipelineError> {
        match command {
            ConfigCommands::Show => format_config_show(&self.config),
            ConfigCommands::Validate => {
                let result = self.config.validate();
                let output = format_config_validation(&result);
                match result {
                    Ok(()) => Ok(output),
                    Err(_) => Err(PipelineError::ConfigError(output)),
                }
            }
        }
    }
}

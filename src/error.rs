//! Error types for the reelgate generation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Denylist loading errors
#[derive(Debug, Error)]
pub enum DenylistError {
    #[error("Denylist file not found: {0}")]
    NotFound(PathBuf),

    #[error("Denylist I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Denylist parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Pipeline-level errors
///
/// Only failures of the external capabilities, bad requests and configuration
/// surface here. Short pools and oversized responses are resolved inside the
/// pipeline and never become errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source returned malformed output: {0}")]
    SourceMalformed(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Denylist error: {0}")]
    Denylist(#[from] DenylistError),
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}

//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::PipelineError;

/// Map pipeline errors to a string for CLI output, with a hint where one helps.
pub fn map_error(e: &PipelineError) -> String {
    match e {
        PipelineError::ProviderNotConfigured(_) | PipelineError::ProviderAuthFailed(_) => {
            format!(
                "{}\nhint: set `provider.api_key` in config or export OPENAI_API_KEY",
                e
            )
        }
        PipelineError::Denylist(crate::error::DenylistError::NotFound(_)) => {
            format!("{}\nhint: pass --denylist <PATH> or set `denylist.path`", e)
        }
        _ => e.to_string(),
    }
}

//! Generation pipeline
//!
//! One invocation flows strictly forward: the accumulator builds a coarse-filtered
//! candidate pool, the composer renders and strictly filters final items, and the
//! budget enforcer bounds the serialized response.

pub mod accumulate;
pub mod compose;
pub mod run;

use crate::budget::BudgetConfig;
use crate::source::PromptConfig;
use serde::{Deserialize, Serialize};

pub use accumulate::{accumulate, AccumulateConfig, AccumulateStats, Pool};
pub use compose::{compose, ComposeConfig, Composition};
pub use run::{GenerateRequest, GenerateResponse, Pipeline};

/// Immutable configuration handed to every pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub accumulate: AccumulateConfig,

    #[serde(default)]
    pub compose: ComposeConfig,

    #[serde(default)]
    pub budget: BudgetConfig,

    #[serde(default)]
    pub prompts: PromptConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.accumulate
            .validate()
            .map_err(|e| format!("accumulate: {}", e))?;
        self.compose
            .validate()
            .map_err(|e| format!("compose: {}", e))?;
        self.budget.validate().map_err(|e| format!("budget: {}", e))?;
        if self.prompts.language.trim().is_empty() {
            return Err("prompts: language cannot be empty".to_string());
        }
        Ok(())
    }
}

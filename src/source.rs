//! Generative capabilities consumed by the pipeline.
//!
//! [`CandidateSource`] produces raw candidates for a style hint and
//! [`ItemRenderer`] turns candidates into presentable items. Both may return
//! more or fewer records than asked for, and neither is trusted to respect the
//! denylist.

use crate::error::PipelineError;
use crate::provider::{ChatMessage, CompletionOptions, ModelProviderClient};
use crate::types::{Candidate, FinalItem};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Produces candidate batches for a style hint
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn generate(
        &self,
        style_hint: &str,
        count: usize,
    ) -> Result<Vec<Candidate>, PipelineError>;
}

/// Renders candidates into caller-facing items
#[async_trait]
pub trait ItemRenderer: Send + Sync {
    async fn render(
        &self,
        candidates: &[Candidate],
        k: usize,
    ) -> Result<Vec<FinalItem>, PipelineError>;
}

/// Prompt wording for the LLM-backed capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    /// System prompt for candidate generation
    #[serde(default = "default_candidate_system")]
    pub candidate_system: String,

    /// System prompt for rendering
    #[serde(default = "default_render_system")]
    pub render_system: String,

    /// Language the rendered items are written in
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_candidate_system() -> String {
    "You scout material from real film productions. For the requested mood, propose \
     new combinations of a memorable movie scene and the practical or visual-effects trick \
     used to shoot it. Describe each with short keys only: scene_keys and trick_keys hold \
     2 to 4 English snake_case keys each."
        .to_string()
}

fn default_render_system() -> String {
    "You introduce movie scenes and their behind-the-scenes production tricks in short, \
     vivid prose. Turn the given candidates into readable items. Be clear and do not \
     exaggerate."
        .to_string()
}

fn default_language() -> String {
    "Korean".to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            candidate_system: default_candidate_system(),
            render_system: default_render_system(),
            language: default_language(),
        }
    }
}

#[derive(Deserialize)]
struct CandidateBatch {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct FinalBatch {
    #[serde(default)]
    items: Vec<FinalItem>,
}

/// Strip a surrounding markdown code fence, if any
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn parse_json_payload<T: DeserializeOwned>(content: &str, what: &str) -> Result<T, PipelineError> {
    serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        PipelineError::SourceMalformed(format!("Could not parse {} from model output: {}", what, e))
    })
}

/// Candidate source backed by a chat-completion model
pub struct LlmCandidateSource {
    client: Arc<dyn ModelProviderClient>,
    options: CompletionOptions,
    prompts: PromptConfig,
}

impl LlmCandidateSource {
    pub fn new(
        client: Arc<dyn ModelProviderClient>,
        options: CompletionOptions,
        prompts: PromptConfig,
    ) -> Self {
        Self {
            client,
            options: CompletionOptions {
                json_response: true,
                ..options
            },
            prompts,
        }
    }

    fn user_prompt(style_hint: &str, count: usize) -> String {
        format!(
            "Mood (summary):\n{}\n\nRequirements:\n\
             - {} candidates\n\
             - Spread across as many different movies as possible\n\
             - Each candidate has movie, scene_keys, trick_keys, one_line_pitch\n\
             - Reply with a JSON object: {{\"candidates\": [...]}}",
            style_hint.trim(),
            count
        )
    }
}

#[async_trait]
impl CandidateSource for LlmCandidateSource {
    async fn generate(
        &self,
        style_hint: &str,
        count: usize,
    ) -> Result<Vec<Candidate>, PipelineError> {
        let messages = vec![
            ChatMessage::system(self.prompts.candidate_system.clone()),
            ChatMessage::user(Self::user_prompt(style_hint, count)),
        ];
        let response = self.client.complete(messages, self.options.clone()).await?;
        let batch: CandidateBatch = parse_json_payload(&response.content, "candidates")?;
        debug!(
            provider = self.client.provider_name(),
            model = %response.model,
            requested = count,
            returned = batch.candidates.len(),
            total_tokens = response.usage.total_tokens,
            "Generated candidate batch"
        );
        Ok(batch.candidates)
    }
}

/// Item renderer backed by a chat-completion model
pub struct LlmItemRenderer {
    client: Arc<dyn ModelProviderClient>,
    options: CompletionOptions,
    prompts: PromptConfig,
}

impl LlmItemRenderer {
    pub fn new(
        client: Arc<dyn ModelProviderClient>,
        options: CompletionOptions,
        prompts: PromptConfig,
    ) -> Self {
        Self {
            client,
            options: CompletionOptions {
                json_response: true,
                ..options
            },
            prompts,
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "{} Write in {}. Reply with a JSON object: {{\"items\": [{{\"movie\": ..., \
             \"scene\": ..., \"behind\": ..., \"vibe_point\": ...}}]}}",
            self.prompts.render_system, self.prompts.language
        )
    }
}

#[async_trait]
impl ItemRenderer for LlmItemRenderer {
    async fn render(
        &self,
        candidates: &[Candidate],
        k: usize,
    ) -> Result<Vec<FinalItem>, PipelineError> {
        let payload = json!({ "candidates": candidates, "count": k });
        let messages = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(payload.to_string()),
        ];
        let response = self.client.complete(messages, self.options.clone()).await?;
        let batch: FinalBatch = parse_json_payload(&response.content, "items")?;
        debug!(
            provider = self.client.provider_name(),
            model = %response.model,
            material = candidates.len(),
            requested = k,
            returned = batch.items.len(),
            "Rendered items"
        );
        Ok(batch.items)
    }
}

//! End-to-end pipeline invocation.

use super::{accumulate, compose, PipelineConfig};
use crate::budget::{enforce, response_chars, BudgetTier, COUNT_KEY, ITEMS_KEY};
use crate::config::ReelgateConfig;
use crate::denylist::{DenylistSource, ForbiddenTitles, JsonFileDenylist};
use crate::error::PipelineError;
use crate::provider::{ModelProviderClient, ProviderFactory};
use crate::source::{CandidateSource, ItemRenderer, LlmCandidateSource, LlmItemRenderer};
use crate::title::{normalize, TitleKey};
use crate::types::FinalItem;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::ops::RangeInclusive;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const K_RANGE: RangeInclusive<usize> = 1..=10;
pub const N_RANGE: RangeInclusive<usize> = 10..=80;
pub const DEFAULT_K: usize = 6;
pub const DEFAULT_N: usize = 40;

const REQUESTED_KEY: &str = "requested";

/// One generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub style_hint: String,
    /// Items wanted in the response
    #[serde(default = "default_k")]
    pub k: usize,
    /// Candidates asked for per generation call
    #[serde(default = "default_n")]
    pub n: usize,
}

fn default_k() -> usize {
    DEFAULT_K
}

fn default_n() -> usize {
    DEFAULT_N
}

impl GenerateRequest {
    pub fn new(style_hint: impl Into<String>) -> Self {
        Self {
            style_hint: style_hint.into(),
            k: DEFAULT_K,
            n: DEFAULT_N,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.style_hint.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "style_hint cannot be empty".to_string(),
            ));
        }
        if !K_RANGE.contains(&self.k) {
            return Err(PipelineError::InvalidRequest(format!(
                "k must be between {} and {}, got {}",
                K_RANGE.start(),
                K_RANGE.end(),
                self.k
            )));
        }
        if !N_RANGE.contains(&self.n) {
            return Err(PipelineError::InvalidRequest(format!(
                "n must be between {} and {}, got {}",
                N_RANGE.start(),
                N_RANGE.end(),
                self.n
            )));
        }
        Ok(())
    }
}

/// Budget-enforced result of one run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    /// Serialized form handed to the caller
    pub payload: Value,
    /// Items actually returned; may be below `requested`
    pub count: usize,
    pub requested: usize,
    /// Items were collapsed to titles by the hard floor
    pub truncated: bool,
    pub tier: BudgetTier,
}

impl GenerateResponse {
    pub fn is_short(&self) -> bool {
        self.count < self.requested
    }

    /// Returned items as typed records
    pub fn items(&self) -> Vec<FinalItem> {
        self.payload
            .get(ITEMS_KEY)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn item_value(item: &FinalItem) -> Value {
    json!({
        "movie": item.movie,
        "scene": item.scene,
        "behind": item.behind,
        "vibe_point": item.vibe_point,
    })
}

fn build_payload(items: &[FinalItem], requested: usize) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert(
        ITEMS_KEY.to_string(),
        Value::Array(items.iter().map(item_value).collect()),
    );
    payload.insert(COUNT_KEY.to_string(), Value::from(items.len()));
    payload.insert(REQUESTED_KEY.to_string(), Value::from(requested));
    payload
}

/// Re-apply the strict title checks to budgeted items.
///
/// Clipping a title down to a prefix can land it on a forbidden key or on the
/// key of an earlier item, so survivors are filtered again on their final text
/// and `count` is refreshed. Returns the number of items dropped.
fn recheck_titles(response: &mut Map<String, Value>, forbidden: &ForbiddenTitles) -> usize {
    let Some(Value::Array(items)) = response.get_mut(ITEMS_KEY) else {
        return 0;
    };

    let before = items.len();
    let mut seen: HashSet<TitleKey> = HashSet::new();
    items.retain(|item| {
        let key = normalize(item.get("movie").and_then(Value::as_str).unwrap_or_default());
        !key.is_empty() && !forbidden.contains(&key) && seen.insert(key)
    });
    let dropped = before - items.len();
    let count = items.len();

    if response.contains_key(COUNT_KEY) {
        response.insert(COUNT_KEY.to_string(), Value::from(count));
    }
    dropped
}

/// Wired pipeline: capabilities, denylist and configuration
pub struct Pipeline {
    candidates: Arc<dyn CandidateSource>,
    renderer: Arc<dyn ItemRenderer>,
    denylist: Arc<dyn DenylistSource>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        candidates: Arc<dyn CandidateSource>,
        renderer: Arc<dyn ItemRenderer>,
        denylist: Arc<dyn DenylistSource>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            candidates,
            renderer,
            denylist,
            config,
        }
    }

    /// Build the LLM-backed pipeline described by the loaded configuration
    ///
    /// A relative denylist path resolves against `workspace_root`;
    /// `denylist_override` replaces the configured path.
    pub fn from_config(
        config: &ReelgateConfig,
        workspace_root: &Path,
        denylist_override: Option<PathBuf>,
    ) -> Result<Self, PipelineError> {
        let provider = config.provider.to_model_provider()?;
        let client: Arc<dyn ModelProviderClient> =
            Arc::from(ProviderFactory::create_client(&provider)?);
        let options = config.provider.default_options.clone();
        let prompts = config.pipeline.prompts.clone();

        let denylist_path = denylist_override.unwrap_or_else(|| config.denylist.path.clone());
        let denylist = JsonFileDenylist::in_workspace(workspace_root, &denylist_path);

        Ok(Self::new(
            Arc::new(LlmCandidateSource::new(
                client.clone(),
                options.clone(),
                prompts.clone(),
            )),
            Arc::new(LlmItemRenderer::new(client, options, prompts)),
            Arc::new(denylist),
            config.pipeline.clone(),
        ))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one invocation
    pub async fn run(&self, request: &GenerateRequest) -> Result<GenerateResponse, PipelineError> {
        request.validate()?;

        let entries = self.denylist.load()?;
        info!(
            denylist = %self.denylist.describe(),
            entries = entries.len(),
            k = request.k,
            n = request.n,
            "Starting generation"
        );

        let pool = accumulate(
            self.candidates.as_ref(),
            &request.style_hint,
            request.n,
            request.k,
            &entries,
            &self.config.accumulate,
        )
        .await?;

        let forbidden = ForbiddenTitles::from_entries(&entries);
        let composition = compose(
            self.renderer.as_ref(),
            &pool.candidates,
            request.k,
            &forbidden,
            &self.config.compose,
        )
        .await?;

        let mut enforced = enforce(
            build_payload(&composition.items, request.k),
            &self.config.budget,
        );
        let dropped = recheck_titles(&mut enforced.response, &forbidden);
        if dropped > 0 {
            warn!(
                dropped,
                tier = %enforced.tier,
                "Clipped titles collided with the denylist or each other"
            );
            enforced.chars = response_chars(&enforced.response);
        }
        let count = enforced
            .response
            .get(ITEMS_KEY)
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        info!(
            requested = request.k,
            returned = count,
            tier = %enforced.tier,
            truncated = enforced.truncated,
            chars = enforced.chars,
            "Generation finished"
        );

        Ok(GenerateResponse {
            payload: Value::Object(enforced.response),
            count,
            requested: request.k,
            truncated: enforced.truncated,
            tier: enforced.tier,
        })
    }
}

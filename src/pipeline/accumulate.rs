//! Pool accumulation: bounded, sequential candidate generation with coarse
//! denylist filtering.

use crate::denylist::{filter_candidates, MatchThresholds};
use crate::error::PipelineError;
use crate::source::CandidateSource;
use crate::types::{Candidate, DenylistEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Accumulation limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulateConfig {
    /// Generation calls per run
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Early-stop target is `target_pool_size * pool_multiplier`...
    #[serde(default = "default_pool_multiplier")]
    pub pool_multiplier: usize,

    /// ...but never below this
    #[serde(default = "default_min_pool")]
    pub min_pool: usize,

    /// Pool never holds more than this many candidates
    #[serde(default = "default_pool_hard_cap")]
    pub pool_hard_cap: usize,

    #[serde(default)]
    pub thresholds: MatchThresholds,
}

fn default_max_attempts() -> usize {
    4
}

fn default_pool_multiplier() -> usize {
    3
}

fn default_min_pool() -> usize {
    30
}

fn default_pool_hard_cap() -> usize {
    200
}

impl Default for AccumulateConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            pool_multiplier: default_pool_multiplier(),
            min_pool: default_min_pool(),
            pool_hard_cap: default_pool_hard_cap(),
            thresholds: MatchThresholds::default(),
        }
    }
}

impl AccumulateConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.pool_multiplier == 0 {
            return Err("pool_multiplier must be at least 1".to_string());
        }
        if self.pool_hard_cap == 0 {
            return Err("pool_hard_cap must be at least 1".to_string());
        }
        // A zero threshold would let a bare title collision reject a candidate
        if self.thresholds.scene_min == 0 || self.thresholds.trick_min == 0 {
            return Err("match thresholds must be at least 1".to_string());
        }
        Ok(())
    }

    /// Pool size at which accumulation stops early
    pub fn stop_size(&self, target_pool_size: usize) -> usize {
        target_pool_size
            .saturating_mul(self.pool_multiplier)
            .max(self.min_pool)
    }
}

/// Counters describing one accumulation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccumulateStats {
    pub attempts: usize,
    pub generated: usize,
    pub rejected: usize,
}

/// Coarse-filtered candidates, earliest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    pub candidates: Vec<Candidate>,
    pub stats: AccumulateStats,
}

impl Pool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Build a candidate pool
///
/// Calls `source` at most `max_attempts` times, one call at a time. An empty
/// pool after every attempt is a valid outcome. Source failures abort the run.
pub async fn accumulate(
    source: &dyn CandidateSource,
    style_hint: &str,
    n_per_call: usize,
    target_pool_size: usize,
    denylist: &[DenylistEntry],
    config: &AccumulateConfig,
) -> Result<Pool, PipelineError> {
    let stop_size = config.stop_size(target_pool_size);
    let mut pool = Pool::default();

    while pool.stats.attempts < config.max_attempts {
        pool.stats.attempts += 1;

        let batch = source.generate(style_hint, n_per_call).await?;
        let generated = batch.len();
        let survivors = filter_candidates(batch, denylist, config.thresholds);
        let rejected = generated - survivors.len();

        pool.stats.generated += generated;
        pool.stats.rejected += rejected;
        pool.candidates.extend(survivors);
        pool.candidates.truncate(config.pool_hard_cap);

        debug!(
            attempt = pool.stats.attempts,
            generated,
            rejected,
            pool = pool.len(),
            "Accumulated candidate batch"
        );

        if pool.len() >= stop_size {
            break;
        }
    }

    info!(
        attempts = pool.stats.attempts,
        generated = pool.stats.generated,
        rejected = pool.stats.rejected,
        pool = pool.len(),
        stop_size,
        "Candidate pool ready"
    );
    Ok(pool)
}

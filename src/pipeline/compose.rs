//! Final composition: render pool material, strictly filter, dedup, retry once.

use crate::denylist::ForbiddenTitles;
use crate::error::PipelineError;
use crate::source::ItemRenderer;
use crate::title::{normalize, TitleKey};
use crate::types::{Candidate, FinalItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

const MATERIAL_RANGE: std::ops::RangeInclusive<usize> = 60..=80;

/// Composer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Pool prefix rendered on the first pass (60..=80)
    #[serde(default = "default_material_size")]
    pub material_size: usize,

    /// Pool prefix rendered on the single retry
    #[serde(default = "default_retry_material_size")]
    pub retry_material_size: usize,
}

fn default_material_size() -> usize {
    60
}

fn default_retry_material_size() -> usize {
    120
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            material_size: default_material_size(),
            retry_material_size: default_retry_material_size(),
        }
    }
}

impl ComposeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !MATERIAL_RANGE.contains(&self.material_size) {
            return Err(format!(
                "material_size must be between {} and {}, got {}",
                MATERIAL_RANGE.start(),
                MATERIAL_RANGE.end(),
                self.material_size
            ));
        }
        if self.retry_material_size <= self.material_size {
            return Err(format!(
                "retry_material_size ({}) must be larger than material_size ({})",
                self.retry_material_size, self.material_size
            ));
        }
        Ok(())
    }
}

/// Composed items plus what happened along the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    pub items: Vec<FinalItem>,
    /// Renderer calls made (0, 1 or 2)
    pub renders: usize,
    /// Items dropped by the strict denylist
    pub rejected: usize,
    /// Items dropped as duplicate or untitled
    pub duplicates: usize,
}

/// First-seen-order accumulator shared across both render passes
struct Admitted<'a> {
    forbidden: &'a ForbiddenTitles,
    seen: HashSet<TitleKey>,
    composition: Composition,
}

impl<'a> Admitted<'a> {
    fn new(forbidden: &'a ForbiddenTitles) -> Self {
        Self {
            forbidden,
            seen: HashSet::new(),
            composition: Composition::default(),
        }
    }

    fn admit(&mut self, rendered: Vec<FinalItem>) {
        for item in rendered {
            let key = normalize(&item.movie);
            if self.forbidden.contains(&key) {
                self.composition.rejected += 1;
                continue;
            }
            if key.is_empty() || !self.seen.insert(key) {
                self.composition.duplicates += 1;
                continue;
            }
            self.composition.items.push(item);
        }
    }

    fn len(&self) -> usize {
        self.composition.items.len()
    }
}

/// Compose at most `k` unique, non-forbidden items from the pool
///
/// Renders the first `material_size` candidates. If fewer than `k` items
/// survive, renders once more from the first `retry_material_size` candidates
/// and merges in first-seen order. Never loops beyond that single retry.
pub async fn compose(
    renderer: &dyn ItemRenderer,
    pool: &[Candidate],
    k: usize,
    forbidden: &ForbiddenTitles,
    config: &ComposeConfig,
) -> Result<Composition, PipelineError> {
    if pool.is_empty() || k == 0 {
        debug!(pool = pool.len(), k, "Nothing to compose");
        return Ok(Composition::default());
    }

    let mut admitted = Admitted::new(forbidden);

    let material = &pool[..pool.len().min(config.material_size)];
    let rendered = renderer.render(material, k).await?;
    admitted.composition.renders += 1;
    debug!(material = material.len(), rendered = rendered.len(), "First render");
    admitted.admit(rendered);

    if admitted.len() < k {
        let material = &pool[..pool.len().min(config.retry_material_size)];
        let rendered = renderer.render(material, k).await?;
        admitted.composition.renders += 1;
        debug!(
            material = material.len(),
            rendered = rendered.len(),
            survivors = admitted.len(),
            "Retry render"
        );
        admitted.admit(rendered);
    }

    let mut composition = admitted.composition;
    composition.items.truncate(k);

    info!(
        requested = k,
        returned = composition.items.len(),
        renders = composition.renders,
        rejected = composition.rejected,
        duplicates = composition.duplicates,
        "Composed final items"
    );
    Ok(composition)
}

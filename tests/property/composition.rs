//! Property-based tests for the final composer

use async_trait::async_trait;
use proptest::prelude::*;
use reelgate::denylist::ForbiddenTitles;
use reelgate::error::PipelineError;
use reelgate::pipeline::{compose, ComposeConfig};
use reelgate::source::ItemRenderer;
use reelgate::title::normalize;
use reelgate::types::{Candidate, DenylistEntry, FinalItem};
use std::collections::HashSet;

/// Renders every candidate, in order, regardless of `k`
struct EchoRenderer;

#[async_trait]
impl ItemRenderer for EchoRenderer {
    async fn render(&self, candidates: &[Candidate], _k: usize) -> Result<Vec<FinalItem>, PipelineError> {
        Ok(candidates.iter().map(|c| FinalItem::titled(c.movie.clone())).collect())
    }
}

/// Test that composition never exceeds k, never repeats a title and never leaks a forbidden one
#[test]
fn test_compose_bounded_unique_and_safe_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let rt = tokio::runtime::Runtime::new().unwrap();

    runner
        .run(
            &(
                proptest::collection::vec("[A-Ca-c ]{0,3}", 0..150),
                proptest::collection::vec("[A-Ca-c]{1,3}", 0..4),
                1usize..=10,
            ),
            |(titles, denied, k)| {
                let pool: Vec<Candidate> = titles.iter().map(|t| Candidate::new(t.as_str(), &[], &[])).collect();
                let forbidden = ForbiddenTitles::from_entries(&[DenylistEntry {
                    id: "f-prop".to_string(),
                    movie: String::new(),
                    aliases: denied.clone(),
                    scene_keys: Vec::new(),
                    trick_keys: Vec::new(),
                }]);

                let composition = rt
                    .block_on(compose(&EchoRenderer, &pool, k, &forbidden, &ComposeConfig::default()))
                    .unwrap();

                assert!(composition.items.len() <= k);
                assert!(composition.renders <= 2);
                let mut seen = HashSet::new();
                for item in &composition.items {
                    let key = normalize(&item.movie);
                    assert!(!key.is_empty());
                    assert!(!forbidden.contains(&key));
                    assert!(seen.insert(key));
                }
                if pool.is_empty() {
                    assert_eq!(composition.renders, 0);
                }
                Ok(())
            },
        )
        .unwrap();
}

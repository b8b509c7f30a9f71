//! End-to-end pipeline scenarios through the public API

use super::test_utils::{entry, titled, write_file, EchoRenderer, ScriptedSource, UnreachableSource};
use reelgate::denylist::{JsonFileDenylist, StaticDenylist};
use reelgate::error::PipelineError;
use reelgate::pipeline::{GenerateRequest, Pipeline, PipelineConfig};
use reelgate::title::normalize;
use reelgate::types::Candidate;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

fn titanic_denylist() -> Arc<StaticDenylist> {
    Arc::new(StaticDenylist::new(vec![entry(
        "f-001",
        "Titanic",
        &["타이타닉"],
        &[],
        &[],
    )]))
}

#[tokio::test]
async fn test_titanic_is_removed_and_duplicates_collapse() {
    let source = Arc::new(ScriptedSource::repeating(titled(&[
        "Titanic",
        "Inception",
        "Inception",
        "Parasite",
    ])));
    let renderer = Arc::new(EchoRenderer::new());
    let pipeline = Pipeline::new(
        source.clone(),
        renderer.clone(),
        titanic_denylist(),
        PipelineConfig::default(),
    );

    let response = pipeline
        .run(&GenerateRequest::new("grand and tense").with_k(3))
        .await
        .unwrap();

    let titles: Vec<String> = response.items().into_iter().map(|i| i.movie).collect();
    assert_eq!(titles, vec!["Inception", "Parasite"]);
    assert_eq!(response.count, 2);
    assert_eq!(response.requested, 3);
    assert!(response.is_short());
    // Coarse filtering keeps Titanic (no key overlap), so all four attempts run
    assert_eq!(source.calls(), 4);
    // First pass plus exactly one retry
    assert_eq!(renderer.materials().len(), 2);
}

#[tokio::test]
async fn test_always_denylisted_generator_yields_empty_result() {
    let source = Arc::new(ScriptedSource::repeating(vec![
        Candidate::new("Titanic", &["bow", "sinking"], &["miniature"]),
        Candidate::new("titanic", &["sinking", "bow", "flood"], &["miniature", "cgi"]),
    ]));
    let renderer = Arc::new(EchoRenderer::new());
    let denylist = Arc::new(StaticDenylist::new(vec![entry(
        "f-001",
        "Titanic",
        &[],
        &["bow", "sinking"],
        &["miniature"],
    )]));
    let pipeline = Pipeline::new(source.clone(), renderer.clone(), denylist, PipelineConfig::default());

    let response = pipeline.run(&GenerateRequest::new("tragedy")).await.unwrap();

    assert_eq!(source.calls(), 4);
    assert!(response.items().is_empty());
    assert_eq!(response.count, 0);
    assert!(renderer.materials().is_empty(), "empty pool never reaches the renderer");
    assert_eq!(response.payload["items"], serde_json::json!([]));
}

#[tokio::test]
async fn test_aliases_from_denylist_file_block_rendered_variants() {
    let temp = TempDir::new().unwrap();
    let path = write_file(
        temp.path(),
        "forbidden.json",
        r#"[
            {"fid": "f-001", "movie": "Titanic", "aliases": ["타이타닉", "The Titanic"]},
            {"fid": "f-002", "movie": "", "aliases": ["Jurassic Park"]}
        ]"#,
    );

    let source = Arc::new(ScriptedSource::repeating(titled(&[
        "THE TITANIC",
        "타이타닉",
        "jurassic-park",
        "Alien",
        "Jaws",
    ])));
    let pipeline = Pipeline::new(
        source,
        Arc::new(EchoRenderer::new()),
        Arc::new(JsonFileDenylist::new(path)),
        PipelineConfig::default(),
    );

    let response = pipeline.run(&GenerateRequest::new("monsters").with_k(5)).await.unwrap();
    let titles: Vec<String> = response.items().into_iter().map(|i| i.movie).collect();
    assert_eq!(titles, vec!["Alien", "Jaws"]);
}

#[tokio::test]
async fn test_results_are_unique_and_bounded_by_k() {
    let batches: Vec<Vec<Candidate>> = (0..4)
        .map(|round| {
            (0..30)
                .map(|i| Candidate::new(format!("Movie {}", (i + round * 7) % 25), &[], &[]))
                .collect()
        })
        .collect();
    let pipeline = Pipeline::new(
        Arc::new(ScriptedSource::new(batches)),
        Arc::new(EchoRenderer::new()),
        Arc::new(StaticDenylist::default()),
        PipelineConfig::default(),
    );

    for k in 1..=10 {
        let response = pipeline
            .run(&GenerateRequest::new("anything").with_k(k))
            .await
            .unwrap();
        let keys: HashSet<_> = response.items().iter().map(|i| normalize(&i.movie)).collect();
        assert_eq!(response.count, k);
        assert_eq!(keys.len(), k);
    }
}

#[tokio::test]
async fn test_oversized_items_are_clipped_in_payload() {
    let pipeline = Pipeline::new(
        Arc::new(ScriptedSource::repeating(titled(&["Alien", "Jaws", "Heat"]))),
        Arc::new(EchoRenderer::with_filler(500)),
        Arc::new(StaticDenylist::default()),
        PipelineConfig::default(),
    );

    let response = pipeline.run(&GenerateRequest::new("dread").with_k(3)).await.unwrap();
    let behind = response.payload["items"][0]["behind"].as_str().unwrap();
    assert_eq!(behind.chars().count(), 180);
    assert!(behind.ends_with('…'));
    assert!(!response.truncated);
}

#[tokio::test]
async fn test_tight_budget_collapses_to_titles() {
    let titles: Vec<String> = (0..20).map(|i| format!("Movie {}", i)).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let mut config = PipelineConfig::default();
    config.budget.max_response_chars = 400;

    let pipeline = Pipeline::new(
        Arc::new(ScriptedSource::repeating(super::test_utils::titled(&refs))),
        Arc::new(EchoRenderer::with_filler(200)),
        Arc::new(StaticDenylist::default()),
        config,
    );

    let response = pipeline.run(&GenerateRequest::new("dread").with_k(10)).await.unwrap();
    assert!(response.truncated);
    assert_eq!(response.count, 10);
    assert_eq!(response.payload["truncated"], true);
    assert!(response.payload.to_string().chars().count() <= 400);
    assert_eq!(response.payload["items"][0], serde_json::json!({"movie": "Movie 0"}));
}

#[tokio::test]
async fn test_source_failure_is_not_swallowed() {
    let pipeline = Pipeline::new(
        Arc::new(UnreachableSource),
        Arc::new(EchoRenderer::new()),
        titanic_denylist(),
        PipelineConfig::default(),
    );
    let result = pipeline.run(&GenerateRequest::new("anything")).await;
    assert!(matches!(result, Err(PipelineError::SourceUnavailable(_))));
}

#[tokio::test]
async fn test_denylist_is_reloaded_for_every_run() {
    let temp = TempDir::new().unwrap();
    let path = write_file(temp.path(), "forbidden.json", "[]");
    let pipeline = Pipeline::new(
        Arc::new(ScriptedSource::repeating(titled(&["Alien", "Jaws"]))),
        Arc::new(EchoRenderer::new()),
        Arc::new(JsonFileDenylist::new(path.clone())),
        PipelineConfig::default(),
    );

    let first = pipeline.run(&GenerateRequest::new("x").with_k(2)).await.unwrap();
    assert_eq!(first.count, 2);

    std::fs::write(&path, r#"[{"id": "a", "movie": "Alien"}]"#).unwrap();
    let second = pipeline.run(&GenerateRequest::new("x").with_k(2)).await.unwrap();
    let titles: Vec<String> = second.items().into_iter().map(|i| i.movie).collect();
    assert_eq!(titles, vec!["Jaws"]);
}

#[tokio::test]
async fn test_returned_titles_stay_unique_and_allowed_after_clipping() {
    let shared = "A".repeat(79);
    let banned = "B".repeat(79);
    let long_titles = [
        format!("{} Part One", shared),
        format!("{} Part Two", shared),
        format!("{} Extended", banned),
        "Heat".to_string(),
    ];
    let titles: Vec<&str> = long_titles.iter().map(String::as_str).collect();
    let denylist = Arc::new(StaticDenylist::new(vec![entry("f-009", &banned, &[], &[], &[])]));
    let pipeline = Pipeline::new(
        Arc::new(ScriptedSource::repeating(titled(&titles))),
        Arc::new(EchoRenderer::new()),
        denylist,
        PipelineConfig::default(),
    );

    let response = pipeline
        .run(&GenerateRequest::new("sprawling").with_k(4))
        .await
        .unwrap();

    let forbidden_key = normalize(&banned);
    let keys: Vec<_> = response.items().iter().map(|i| normalize(&i.movie)).collect();
    let unique: HashSet<_> = keys.iter().cloned().collect();
    assert_eq!(unique.len(), keys.len(), "returned title keys repeat: {:?}", keys);
    assert!(keys.iter().all(|key| *key != forbidden_key));
    assert_eq!(keys.len(), 2);
    assert_eq!(response.count, 2);
    assert_eq!(response.payload["count"], 2);
}

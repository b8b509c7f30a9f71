//! Integration tests for the reelgate generation pipeline

mod budget_cascade;
mod denylist_loading;
mod model_providers;
mod pipeline_scenarios;
mod test_utils;

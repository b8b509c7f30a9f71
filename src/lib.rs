//! Reelgate: Denylist-Safe Idea Generation
//!
//! Produces a bounded list of movie-scene and production-trick items from an
//! external generative source, guaranteeing that no item resembles a denylist
//! entry and that the serialized response never exceeds a hard character budget.

pub mod budget;
pub mod cli;
pub mod config;
pub mod denylist;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod source;
pub mod title;
pub mod types;

pub use error::{DenylistError, PipelineError};
pub use pipeline::{GenerateRequest, GenerateResponse, Pipeline};

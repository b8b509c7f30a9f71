//! Denylist
//!
//! Forbidden titles and the two matchers that enforce them. The coarse matcher
//! screens raw candidates by near-duplicate content; the strict matcher is the
//! final gate on rendered items and is alias-aware.

pub mod matcher;
pub mod source;

pub use matcher::{
    filter_candidates, filter_items, is_forbidden_candidate, ForbiddenTitles, MatchThresholds,
};
pub use source::{DenylistConfig, DenylistSource, JsonFileDenylist, StaticDenylist};

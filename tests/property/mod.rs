//! Property-based tests for normalization, composition and budget guarantees

mod composition;

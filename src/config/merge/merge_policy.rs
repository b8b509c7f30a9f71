//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key; tables merge rather than replace, so a
//! workspace file can override one budget limit without restating the rest.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("provider.provider_type", "openai")?
        .set_default("provider.model", "gpt-4o-mini")?
        .set_default("denylist.path", "forbidden.json")
}

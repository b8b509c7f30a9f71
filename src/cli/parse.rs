//! CLI parse: clap types for reelgate. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reelgate CLI - denylist-safe movie scene and production-trick ideas
#[derive(Parser)]
#[command(name = "reelgate")]
#[command(about = "Generate denylist-safe movie scene ideas within a bounded response size")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate scene ideas for a mood
    Generate {
        /// Mood or style summary to generate for
        #[arg(long)]
        style_hint: String,

        /// Number of items to return (1-10)
        #[arg(short = 'k', long, default_value = "6")]
        k: usize,

        /// Candidates requested per generation call (10-80)
        #[arg(short = 'n', long, default_value = "40")]
        n: usize,

        /// Denylist file (overrides `denylist.path`)
        #[arg(long)]
        denylist: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Validate the effective configuration
    Validate,
}

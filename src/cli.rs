//! CLI domain: parse, route, help, output, and presentation only.
//! No pipeline logic; the route table dispatches to the pipeline and config services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{
    format_config_show, format_config_validation, format_generate_json, format_generate_text,
};
pub use route::RunContext;

//! CLI domain: parse, route, output, and the interactive wizard only.
//! No artifact logic; the single route table dispatches to the generation
//! facade and presentation helpers.

mod output;
mod parse;
mod route;
mod wizard;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::RunContext;
pub use wizard::collect_config;

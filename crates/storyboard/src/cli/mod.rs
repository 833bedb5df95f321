//! Command-line interface module.

mod commands;
mod generate;

pub use commands::{Cli, Commands, StyleArgs};
pub use generate::{load_config, run_personas, run_scenes};

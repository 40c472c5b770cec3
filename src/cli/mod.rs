//! CLI module for userdir
//!
//! Provides command-line interface for:
//! - serve: Select a backend and serve the HTTP API
//! - config: Print the effective configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ServerArgs};
pub use commands::{print_config, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};

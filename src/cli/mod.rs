//! CLI module for the customer API
//!
//! Provides command-line interface for:
//! - serve: Load configuration, connect the store and run the HTTP server
//! - check-config: Validate configuration and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};

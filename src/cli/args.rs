//! CLI argument definitions using clap
//!
//! Commands:
//! - customer-api serve [--config <path>] [--port <port>] [--store onyx|memory]
//! - customer-api check-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::StoreBackend;

/// Customer API - REST facade over an Onyx document database
#[derive(Parser, Debug)]
#[command(name = "customer-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to a JSON configuration file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to bind, overriding configuration
        #[arg(long)]
        port: Option<u16>,

        /// Store backend, overriding configuration
        #[arg(long)]
        store: Option<StoreBackend>,
    },

    /// Load and validate configuration, then exit
    CheckConfig {
        /// Path to a JSON configuration file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

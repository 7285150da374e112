//! CLI definitions for paramscope.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Paramscope CLI.
#[derive(Parser)]
#[command(name = "paramscope")]
#[command(about = "Inspect the API requests of a browser page")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ./paramscope.toml, then ~/.paramscope/config.toml)
    #[arg(short, long, global = true, env = "PARAMSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Attach to a Chrome page and inspect its API traffic live
    Watch {
        /// Chrome debugging endpoint (overrides [cdp] endpoint)
        #[arg(long)]
        endpoint: Option<String>,

        /// Attach to the first page whose URL or title contains this
        #[arg(long)]
        target: Option<String>,
    },

    /// Inspect the API requests recorded in a HAR file
    Replay {
        /// Path to the .har file
        file: PathBuf,

        /// Only show requests whose URL contains this term
        #[arg(long)]
        search: Option<String>,

        /// Show details of this row (1-based)
        #[arg(long)]
        select: Option<usize>,
    },

    /// Load and validate the configuration
    CheckConfig,
}

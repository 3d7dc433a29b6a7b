// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tether CLI
//!
//! Tracks local files bound to named external sources and synchronizes
//! them by modification time.

mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "tether")]
#[command(author, version, about = "Track and synchronize files against external sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a file against a declared source
    #[command(name = "track-add", alias = "add")]
    TrackAdd {
        /// File to track
        path: String,

        /// Source name declared in tether.toml
        source: String,
    },

    /// Stop tracking a file
    Untrack {
        /// Tracked file
        path: String,
    },

    /// Re-fetch a tracked file from its source
    Pull {
        /// Tracked file
        path: String,

        /// Overwrite without confirmation even if the local copy is newer
        #[arg(short, long)]
        force: bool,
    },

    /// Push a tracked file into its source
    Push {
        /// Tracked file
        path: String,

        /// Overwrite without confirmation even if the source copy is newer
        #[arg(short, long)]
        force: bool,
    },

    /// Reconcile every tracked file by modification time
    Sync,

    /// List declared sources
    Sources,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::TrackAdd { path, source } => commands::track_add(&path, &source).await,
        Commands::Untrack { path } => commands::untrack(&path).await,
        Commands::Pull { path, force } => commands::pull(&path, force).await,
        Commands::Push { path, force } => commands::push(&path, force).await,
        Commands::Sync => commands::sync().await,
        Commands::Sources => commands::sources().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

//! Clipstick CLI — Command-line interface for sticker editing and export.
//!
//! Usage:
//!   clipstick probe <PATH>       Show probed media metadata
//!   clipstick duration <PATH>    Report the effective output duration
//!   clipstick graph <PATH>       Print the compiled transform graph
//!   clipstick preview <PATH>     Run a headless preview simulation
//!   clipstick export <PATH>      Render the sticker
//!   clipstick check              Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::EditArgs;

#[derive(Parser)]
#[command(
    name = "clipstick",
    about = "Turn any video clip into a Telegram video sticker",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show probed media metadata
    Probe {
        /// Path to the source video
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report the effective output duration of an edit
    Duration {
        /// Path to the source video
        path: PathBuf,

        #[command(flatten)]
        edit: EditArgs,
    },

    /// Print the compiled transform graph for an edit
    Graph {
        /// Path to the source video
        path: PathBuf,

        #[command(flatten)]
        edit: EditArgs,

        /// Print the full stage graph as JSON instead of filter syntax
        #[arg(long)]
        json: bool,
    },

    /// Run a headless preview simulation of an edit
    Preview {
        /// Path to the source video
        path: PathBuf,

        #[command(flatten)]
        edit: EditArgs,

        /// Wall-clock seconds to simulate
        #[arg(long, default_value = "6.0")]
        secs: f64,

        /// Pace the loop off the monotonic clock instead of running
        /// simulated time as fast as possible
        #[arg(long)]
        realtime: bool,
    },

    /// Render the sticker
    Export {
        /// Path to the source video
        path: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        edit: EditArgs,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    clipstick_common::logging::init_logging(&clipstick_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Probe { path, json } => commands::probe::run(path, json),
        Commands::Duration { path, edit } => commands::duration::run(path, edit),
        Commands::Graph { path, edit, json } => commands::graph::run(path, edit, json),
        Commands::Preview {
            path,
            edit,
            secs,
            realtime,
        } => commands::preview::run(path, edit, secs, realtime),
        Commands::Export { path, output, edit } => commands::export::run(path, output, edit).await,
        Commands::Check => commands::check::run(),
    }
}

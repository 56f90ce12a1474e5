//! CTM CLI - Inspection tool for input movies
//!
//! # Commands
//!
//! - `ctm info` - Show a movie's header and per-channel record counts
//! - `ctm dump` - Print every decoded record
//! - `ctm check` - Validate a movie header against a title and build
//! - `ctm script` - Validate an input script
//! - `ctm config` - Show the effective movie configuration
//!
//! # Usage
//!
//! ```bash
//! ctm info run.ctm
//! ctm dump run.ctm --limit 20
//! ctm check run.ctm --program-id 0004000000055D00 --revision 1a2b...
//! ctm config --movie-play run.ctm --movie-test
//! ```

mod config;
mod movie;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;

/// CTM CLI - Inspection tool for input movies
#[derive(Parser)]
#[command(name = "ctm")]
#[command(about = "Inspect and validate CTM input movies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a movie's header and per-channel record counts
    Info(movie::InfoArgs),

    /// Print every decoded record
    Dump(movie::DumpArgs),

    /// Validate a movie header against a title and build
    Check(movie::CheckArgs),

    /// Validate an input script
    Script(script::ScriptArgs),

    /// Show the effective movie configuration
    Config(config::ConfigArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Info(args) => movie::info(args, &mut out),
        Commands::Dump(args) => movie::dump(args, &mut out),
        Commands::Check(args) => movie::check(args, &mut out),
        Commands::Script(args) => script::execute(args, &mut out),
        Commands::Config(args) => config::execute(args, &mut out),
    }
}

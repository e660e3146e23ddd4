//! Bastion CLI - validate and view village layouts.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bastion - village layout validator
#[derive(Parser, Debug)]
#[command(name = "bastion")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and validate a village
    Check {
        /// Village snapshot to validate (without one, nothing is validated)
        #[arg(long, alias = "input_village")]
        input_village: Option<PathBuf>,

        #[command(flatten)]
        world: cli::WorldArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Draw the village grid after the verdict
        #[arg(long)]
        render: bool,
    },

    /// Interactive TUI to look at a village and its warnings
    View {
        /// Village snapshot to show
        #[arg(long, alias = "input_village", required = true)]
        input_village: PathBuf,

        #[command(flatten)]
        world: cli::WorldArgs,
    },

    /// Validate many villages in parallel
    Batch {
        /// Village snapshot files
        #[arg(required = true)]
        villages: Vec<PathBuf>,

        #[command(flatten)]
        world: cli::WorldArgs,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Check {
            input_village,
            world,
            format,
            render,
        } => cli::check::execute(input_village, &world, format, render),

        Commands::View {
            input_village,
            world,
        } => cli::view::execute(&input_village, &world),

        Commands::Batch {
            villages,
            world,
            threads,
            format,
            progress,
        } => cli::batch::execute(&villages, &world, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

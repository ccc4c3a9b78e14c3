//! Squadron CLI - Command-line interface for laying out, simulating and
//! watching squad formations.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Squadron - A golden-angle squad formation engine
#[derive(Parser, Debug)]
#[command(name = "squadron")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "squadron=trace" (default: RUST_LOG, then warn)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print target positions for a squad of N soldiers
    Layout {
        /// Number of soldiers
        #[arg(required = true)]
        count: usize,

        /// Radius factor override (0-1)
        #[arg(short, long)]
        radius_factor: Option<f32>,

        /// Angle factor override (0-1)
        #[arg(short, long)]
        angle_factor: Option<f32>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run a scripted scenario frame by frame
    Simulate {
        /// Scenario file (JSON)
        #[arg(required = true)]
        scenario: PathBuf,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only list frames that applied events
        #[arg(short, long)]
        quiet: bool,

        /// Plot the final frame (text format only)
        #[arg(short, long)]
        plot: bool,
    },

    /// Interactive TUI to steer and grow a squad in real time
    Watch {
        /// Scenario file to start from (default: empty live session)
        scenario: Option<PathBuf>,

        /// Session length in frames when no scenario is given
        #[arg(long, default_value = "36000")]
        frames: u32,

        /// Frame rate when no scenario is given
        #[arg(long, default_value = "60")]
        frame_rate: f32,

        /// Save the session as a scenario file on exit
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Measure packing quality over a grid of spiral parameters
    Sweep {
        /// Smallest radius factor
        #[arg(long, default_value = "0.1")]
        radius_min: f32,

        /// Largest radius factor
        #[arg(long, default_value = "1.0")]
        radius_max: f32,

        /// Radius factor samples
        #[arg(long, default_value = "10")]
        radius_steps: u32,

        /// Smallest angle factor
        #[arg(long, default_value = "0.5")]
        angle_min: f32,

        /// Largest angle factor
        #[arg(long, default_value = "1.0")]
        angle_max: f32,

        /// Angle factor samples
        #[arg(long, default_value = "51")]
        angle_steps: u32,

        /// Soldiers per layout (default: min(max_soldiers, 500))
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Rows shown in text output
        #[arg(short, long, default_value = "20")]
        top: usize,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // The TUI owns the terminal, so log lines would corrupt it
    if !matches!(args.command, Commands::Watch { .. }) {
        cli::init_logging(args.log_level.as_deref());
    }

    let config = args.config;
    let result = match args.command {
        Commands::Layout {
            count,
            radius_factor,
            angle_factor,
            format,
        } => cli::layout::execute(count, radius_factor, angle_factor, format, config),

        Commands::Simulate {
            scenario,
            format,
            quiet,
            plot,
        } => cli::simulate::execute(scenario, format, quiet, plot, config),

        Commands::Watch {
            scenario,
            frames,
            frame_rate,
            save,
        } => cli::watch::execute(scenario, frames, frame_rate, save, config),

        Commands::Sweep {
            radius_min,
            radius_max,
            radius_steps,
            angle_min,
            angle_max,
            angle_steps,
            count,
            threads,
            top,
            format,
            progress,
        } => cli::sweep::execute(
            cli::sweep::Grid {
                min: radius_min,
                max: radius_max,
                steps: radius_steps,
            },
            cli::sweep::Grid {
                min: angle_min,
                max: angle_max,
                steps: angle_steps,
            },
            count,
            threads,
            top,
            format,
            progress,
            config,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

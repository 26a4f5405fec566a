//! Makespan CLI - command-line interface for the makespan pipeline scheduler.

mod commands;
mod discovery;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::Result;

use crate::commands::schedule::{OutputFormat, ScheduleOptions, TieBreakArg};
use crate::logging::LogLevel;

#[derive(Parser)]
#[command(name = "makespan")]
#[command(
    author,
    version,
    about = "Computes the minimum execution time of a grouped task pipeline",
    long_about = "Computes the minimum execution time of a task pipeline on a fixed number of \
                  CPU cores. All tasks of a group must finish before another group starts; \
                  ungrouped tasks may run at any time. Prints a minute-by-minute scheduling \
                  diagram of the solution."
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the pipeline file (searches for pipeline.txt if not specified)
    #[arg(short, long, global = true)]
    pipeline: Option<PathBuf>,

    /// Number of CPU cores available (defaults to the number of logical CPUs)
    #[arg(
        short = 'c',
        long = "cpu-cores",
        alias = "cpu_cores",
        global = true,
        allow_negative_numbers = true
    )]
    cpu_cores: Option<i64>,

    /// File receiving timestamped error records
    #[arg(long, global = true, default_value = "error.log")]
    log_file: PathBuf,

    /// Console diagnostics level
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the schedule and print the diagram (default)
    Schedule {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Merge consecutive identical minutes into one row
        #[arg(long)]
        compact: bool,

        /// Merge consecutive minutes of the same group into one row
        #[arg(long, conflicts_with = "compact")]
        by_group: bool,

        /// Order in which ready tasks claim free cores
        #[arg(long, value_enum, default_value = "shortest")]
        tie_break: TieBreakArg,
    },

    /// List all tasks in the pipeline
    List {
        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show dependency graph
    Graph {
        /// Output format (ascii, dot)
        #[arg(short, long, default_value = "ascii")]
        format: String,
    },

    /// Validate the pipeline file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_file, cli.log_level) {
        eprintln!("{:?}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::record_failure(&e);
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let pipeline_path = match cli.pipeline {
        Some(path) => path,
        None => discovery::find_pipeline().map_err(|e| miette::miette!("{}", e))?,
    };

    match cli.command {
        Some(Commands::Schedule {
            format,
            compact,
            by_group,
            tie_break,
        }) => commands::schedule::execute(
            &pipeline_path,
            cli.cpu_cores,
            &ScheduleOptions {
                format,
                compact,
                by_group,
                tie_break,
            },
        ),

        Some(Commands::List { detailed }) => commands::list::execute(&pipeline_path, detailed),

        Some(Commands::Graph { format }) => commands::graph::execute(&pipeline_path, &format),

        Some(Commands::Validate) => commands::validate::execute(&pipeline_path, cli.cpu_cores),

        None => commands::schedule::execute(
            &pipeline_path,
            cli.cpu_cores,
            &ScheduleOptions::default(),
        ),
    }
}

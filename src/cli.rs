use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::api::jobs::{JobTracker, dto::CheckResponse};
use crate::error::AppError;

#[derive(Debug, Parser)]
#[command(name = "job-tracker", version, about = "Track new postings on Greenhouse and Lever boards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Run one check cycle and print the result as JSON
    Check {
        /// Include every currently fetched posting, not just the new ones
        #[arg(long)]
        include_all: bool,
    },
    /// Print seen-set statistics as JSON
    Stats,
    /// List the configured companies
    Companies,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// Execute a one-shot command against `tracker`, writing JSON to `out`.
/// `Serve` is handled by the caller.
pub async fn run(
    command: &Command,
    tracker: &JobTracker,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match command {
        Command::Serve => Ok(()),
        Command::Check { include_all } => {
            let report = tracker.run_check().await?;
            print_json(out, &CheckResponse::from_report(report, *include_all))
        }
        Command::Stats => print_json(out, &tracker.stats().await),
        Command::Companies => {
            let companies: Vec<_> = tracker.registry().iter().collect();
            print_json(out, &companies)
        }
    }
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

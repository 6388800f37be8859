// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jobhunter: a single entry point that runs the job-search pipeline.

mod commands;
mod config;
mod exit_error;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobhunter", version, about = "Personal batch job-search pipeline")]
struct Cli {
    /// Directory holding settings.toml, master_resume.toml, and site_configs/.
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape, dedup, filter, score, tailor, and notify in one invocation.
    Run {
        /// Run scrape/dedup/filter/score only; skip tailoring and
        /// notifying, leaving the checkpoint ready for a later plain
        /// `run` to finish the job.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the most recently recorded run's summary.
    Status,
    /// Record feedback for a job (mirrors the Telegram inline-button actions).
    Feedback {
        job_id: String,
        /// applied, skip, or not_relevant.
        action: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run { dry_run } => commands::run::handle(&cli.config_dir, dry_run).await,
        Command::Status => commands::status::handle(&cli.config_dir).await,
        Command::Feedback { job_id, action, reason } => {
            commands::feedback::handle(&cli.config_dir, &job_id, &action, reason).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(e.code);
    }
}

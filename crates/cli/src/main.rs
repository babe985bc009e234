// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ea - topic event bus CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{check, matching, publish};
use std::path::{Path, PathBuf};

use crate::config::CliConfig;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "ea", version, about = "Topic event bus - publish, subscribe, authorize")]
struct Cli {
    /// Configuration file (dispatcher, policy, subscribers)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deliver an event synchronously
    Send(publish::PublishArgs),
    /// Queue an event for asynchronous delivery
    Post(publish::PostArgs),
    /// Evaluate the access policy for one request
    Check(check::CheckArgs),
    /// Test whether a pattern matches a topic
    Match(matching::MatchArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = setup_logging(cli.log_file.as_deref())?;

    let config = CliConfig::load(cli.config.as_deref())?;
    tracing::debug!(subscribers = config.subscribers.len(), "configuration loaded");

    match cli.command {
        Commands::Send(args) => publish::send(args, &config, cli.format),
        Commands::Post(args) => publish::post(args, &config, cli.format),
        Commands::Check(args) => check::check(args, &config, cli.format),
        Commands::Match(args) => matching::matches(args, cli.format),
    }
}

/// Log filter comes from `EA_LOG`, defaulting to warnings only
fn setup_logging(
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("EA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let file_name = path
                .file_name()
                .with_context(|| format!("invalid log file path {}", path.display()))?;
            std::fs::create_dir_all(dir)?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
    }
}

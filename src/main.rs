//! crud-perms CLI
//!
//! Evaluate, combine and invert group-based CRUD permissions.

use clap::Parser;
use crud_perms::cli::{Args, run};
use crud_perms::config::{LogFormat, LoggingConfig, load_config};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse CLI arguments
    let args = Args::parse();

    // Only user lookups read the config file, which also sets the log format
    let config = if args.command.needs_config() {
        Some(load_config(args.config.as_deref()))
    } else {
        None
    };

    let logging = match &config {
        Some(Ok(config)) => config.logging.clone(),
        _ => LoggingConfig::default(),
    };
    let level = args.log_level.as_deref().unwrap_or(&logging.level);
    init_logging(level, logging.format);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting crud-perms");

    let config = config
        .transpose()
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    if let Some(config) = &config {
        info!(
            file = ?config.file,
            policies = config.policies.len(),
            users = config.directory.users.len(),
            "Loaded configuration"
        );
    }

    let config = config.unwrap_or_default();
    let outcome = run(args.command, &config, &mut std::io::stdout().lock()).await?;
    Ok(outcome.into())
}

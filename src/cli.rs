//! Command-line interface
//!
//! Argument definitions and subcommand dispatch for the `crud-perms` binary.
//! Results are written as pretty JSON to the given writer; logging setup is
//! left to the binary.

use crate::access_control::{
    Action, ListMode, ModedTable, PermissionEvaluator, PermissionTable, combine, invert,
};
use crate::config::{AppConfig, is_log_level, load_spec, load_table};
use crate::groups::create_group_source;
use crate::policy::PolicySet;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Group-based CRUD permission evaluation
#[derive(Parser, Debug)]
#[command(name = "crud-perms")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "CRUD_PERMS_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true, env = "CRUD_PERMS_LOG_LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the permission table for a set of groups
    Evaluate {
        /// Permission spec file (.json or .toml)
        #[arg(short, long)]
        spec: PathBuf,

        /// Comma-separated groups the user belongs to
        #[arg(short, long, value_delimiter = ',')]
        groups: Vec<String>,

        /// Read the spec as a blacklist
        #[arg(long)]
        blacklist: bool,
    },

    /// Check a single action on a single resource (exit code 1 when denied)
    Check {
        /// Permission spec file (.json or .toml)
        #[arg(short, long)]
        spec: PathBuf,

        /// Resource to check
        #[arg(short, long)]
        resource: String,

        /// Action: c, r, u, d (or create, read, update, delete)
        #[arg(short, long, value_parser = parse_action)]
        action: Action,

        /// Comma-separated groups the user belongs to
        #[arg(short, long, value_delimiter = ',')]
        groups: Vec<String>,

        /// Read the spec as a blacklist
        #[arg(long)]
        blacklist: bool,
    },

    /// Negate every flag of a permission table
    Invert {
        /// Permission table file (.json or .toml)
        table: PathBuf,
    },

    /// Merge two permission tables produced under known modes
    Combine {
        /// First permission table
        #[arg(long)]
        left: PathBuf,

        /// Mode the first table was produced under
        #[arg(long, value_parser = parse_mode, default_value = "whitelist")]
        left_mode: ListMode,

        /// Second permission table
        #[arg(long)]
        right: PathBuf,

        /// Mode the second table was produced under
        #[arg(long, value_parser = parse_mode, default_value = "whitelist")]
        right_mode: ListMode,
    },

    /// Evaluate all configured policies for a user in the configured directory
    User {
        /// User name as listed under [directory.users]
        name: String,
    },
}

impl Command {
    /// Whether the subcommand reads policies or the directory from the config file
    pub fn needs_config(&self) -> bool {
        matches!(self, Command::User { .. })
    }
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `check` found the action not permitted
    Denied,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Denied => ExitCode::FAILURE,
        }
    }
}

pub fn parse_action(s: &str) -> Result<Action, String> {
    Action::try_parse(s).ok_or_else(|| format!("unknown action '{}', expected c, r, u or d", s))
}

pub fn parse_mode(s: &str) -> Result<ListMode, String> {
    ListMode::try_parse(s)
        .ok_or_else(|| format!("unknown mode '{}', expected whitelist or blacklist", s))
}

pub fn parse_log_level(s: &str) -> Result<String, String> {
    if is_log_level(s) {
        Ok(s.to_lowercase())
    } else {
        Err(format!(
            "unknown log level '{}', expected trace, debug, info, warn or error",
            s
        ))
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Run a subcommand, writing its result to `out`
///
/// `config` is only consulted by subcommands for which
/// [`Command::needs_config`] is true.
pub async fn run<W: Write>(
    command: Command,
    config: &AppConfig,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    match command {
        Command::Evaluate {
            spec,
            groups,
            blacklist,
        } => {
            let spec = load_spec(&spec)
                .inspect_err(|e| error!(error = %e, "Failed to load permission spec"))?;
            let evaluator =
                PermissionEvaluator::with_mode(&spec, ListMode::from_blacklist_flag(blacklist));
            write_json(out, &evaluator.evaluate(&groups))?;
        }
        Command::Check {
            spec,
            resource,
            action,
            groups,
            blacklist,
        } => {
            let spec = load_spec(&spec)
                .inspect_err(|e| error!(error = %e, "Failed to load permission spec"))?;
            let evaluator =
                PermissionEvaluator::with_mode(&spec, ListMode::from_blacklist_flag(blacklist));
            let allowed = evaluator.has_permission(&resource, &groups, action);
            writeln!(out, "{}", allowed)?;
            if !allowed {
                return Ok(Outcome::Denied);
            }
        }
        Command::Invert { table } => {
            let table = load_table(&table)
                .inspect_err(|e| error!(error = %e, "Failed to load permission table"))?;
            write_json(out, &invert(&table))?;
        }
        Command::Combine {
            left,
            left_mode,
            right,
            right_mode,
        } => {
            let left = load_table(&left)
                .inspect_err(|e| error!(error = %e, "Failed to load left permission table"))?;
            let right = load_table(&right)
                .inspect_err(|e| error!(error = %e, "Failed to load right permission table"))?;
            let combined = combine(
                &ModedTable::new(left_mode, left),
                &ModedTable::new(right_mode, right),
            );
            write_json(out, &combined)?;
        }
        Command::User { name } => {
            let policies = PolicySet::load(&config.policies)
                .inspect_err(|e| error!(error = %e, "Failed to load policies"))?;
            if policies.is_empty() {
                anyhow::bail!("no policies configured (add [[policies]] to the config file)");
            }

            let source = create_group_source(&config.directory);
            let result = policies
                .evaluate_user(&*source, &name)
                .await
                .inspect_err(|e| error!(error = %e, user = %name, "Failed to resolve groups"))
                .with_context(|| format!("evaluating permissions for '{}'", name))?;

            // A non-empty set always folds to a table
            let table = result.map(|moded| moded.table).unwrap_or_else(PermissionTable::new);
            write_json(out, &table)?;
        }
    }

    Ok(Outcome::Success)
}

//! Report data directory tool
//!
//! # Usage
//!
//! ```bash
//! datadir paths [vector-store|report-source] [--json]
//! datadir status [--json] [--strict]
//! datadir settings [--json]
//! datadir env
//! ```
//!
//! # Configuration
//!
//! Loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (only with --config)
//! 3. Environment variables (CHROMA_DB_PATH, JIRA_CSV_PATH, ...), after ./.env
//! 4. CLI flags

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use datadir_cli::{
    build_resolver, check_settings, init_logging, load_env_file, load_settings, show_env,
    show_paths, show_settings, show_status, startup_log_level, Cli, Commands,
};
use datadir_types::ProcessEnv;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let env_file = load_env_file(cli.env_file.as_deref())?;
    init_logging(&startup_log_level(&cli, &ProcessEnv))?;
    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    let settings = load_settings(&cli, &ProcessEnv)?;
    check_settings(&settings, matches!(cli.command, Commands::Settings { .. }))?;

    let resolver = build_resolver(&cli, &settings, ProcessEnv);
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Paths { resource, json } => {
            show_paths(&mut out, &resolver, resource, json)?;
        }
        Commands::Status { json, strict } => {
            let available = show_status(&mut out, &resolver, json)?;
            if strict && !available {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Settings { json } => {
            show_settings(&mut out, &settings, &resolver, json)?;
        }
        Commands::Env => {
            show_env(&mut out, &ProcessEnv)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

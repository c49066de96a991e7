//! CLI argument parsing for `datadir`.
//!
//! Flags override every other config source.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use datadir_types::DataResource;

/// Report data directory
///
/// Shows where the vector store and the report CSV live, and whether they are there.
#[derive(Parser, Debug)]
#[command(name = "datadir")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (none is read unless given)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Load variables from this file instead of ./.env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Project root that default paths are relative to
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override the vector store directory
    #[arg(long, global = true)]
    pub vector_store_path: Option<PathBuf>,

    /// Override the report source CSV
    #[arg(long, global = true)]
    pub report_source_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print resolved paths
    Paths {
        /// Print only this resource's path (vector-store, report-source)
        resource: Option<DataResource>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether each resolved path exists and has the expected kind
    Status {
        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Exit non-zero unless every resource is available
        #[arg(long)]
        strict: bool,
    },

    /// Print the effective settings
    Settings {
        /// Output JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// List recognized environment variables and their values
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_paths_with_resource() {
        let cli = Cli::parse_from(["datadir", "paths", "report-source", "--json"]);
        match cli.command {
            Commands::Paths { resource, json } => {
                assert_eq!(resource, Some(DataResource::ReportSource));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "datadir",
            "status",
            "--strict",
            "--vector-store-path",
            "/mnt/vectors",
            "--root",
            "/srv/app",
        ]);
        assert_eq!(cli.vector_store_path, Some(PathBuf::from("/mnt/vectors")));
        assert_eq!(cli.root, Some(PathBuf::from("/srv/app")));
        assert!(matches!(cli.command, Commands::Status { strict: true, .. }));
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let result = Cli::try_parse_from(["datadir", "paths", "postgres"]);
        assert!(result.is_err());
    }
}

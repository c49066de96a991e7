//! `datadir` command library.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (paths, status, settings, env)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    build_resolver, check_settings, init_logging, load_env_file, load_settings, show_env,
    show_paths, show_settings, show_status, startup_log_level,
};

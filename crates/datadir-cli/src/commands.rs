//! Command implementations for `datadir`.
//!
//! Handles:
//! - paths: resolve each resource
//! - status: probe each resolved path
//! - settings: print the effective settings
//! - env: list recognized variables
//!
//! Output goes to the given writer; logs go to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use datadir_types::env as vars;
use datadir_types::{
    DataDirReport, DataResource, EnvSource, PathResolver, PathState, PathStatus, Settings,
};

use crate::cli::Cli;

/// Load variables from `path`, or from `./.env` when no path is given.
///
/// Variables already set in the process are kept. A missing `./.env` is fine;
/// a missing explicit file is an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e).context("Failed to load .env"),
        },
    }
}

/// Load settings (defaults -> file -> env) and apply CLI overrides.
///
/// Values are not validated here; see [`check_settings`].
pub fn load_settings<E: EnvSource>(cli: &Cli, env: &E) -> Result<Settings> {
    let mut settings = Settings::load_layers(cli.config.as_deref(), env)
        .context("Failed to load configuration")?;

    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }

    Ok(settings)
}

/// Validate settings. With `fatal`, an invalid value is an error; otherwise
/// it is logged and ignored, since path resolution does not depend on it.
pub fn check_settings(settings: &Settings, fatal: bool) -> Result<()> {
    match settings.validate() {
        Ok(()) => Ok(()),
        Err(e) if fatal => Err(e).context("Invalid configuration"),
        Err(e) => {
            warn!("{}", e);
            Ok(())
        }
    }
}

/// Build the path resolver: flags -> env -> config file -> defaults.
pub fn build_resolver<E: EnvSource>(cli: &Cli, settings: &Settings, env: E) -> PathResolver<E> {
    let mut resolver = settings.path_resolver(env);
    if let Some(root) = &cli.root {
        resolver = resolver.with_root(root);
    }
    if let Some(path) = &cli.vector_store_path {
        resolver = resolver.with_flag_path(DataResource::VectorStore, path);
    }
    if let Some(path) = &cli.report_source_path {
        resolver = resolver.with_flag_path(DataResource::ReportSource, path);
    }
    resolver
}

/// Log level to use before settings are loaded: `--log-level`, then
/// `DATADIR_LOG_LEVEL`, then `info`. `RUST_LOG` is handled by [`init_logging`].
pub fn startup_log_level<E: EnvSource>(cli: &Cli, env: &E) -> String {
    cli.log_level
        .clone()
        .or_else(|| env.var(vars::logging::LOG_LEVEL))
        .unwrap_or_else(|| "info".to_string())
}

/// Install the tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Print resolved paths. With `only`, print just that path.
pub fn show_paths<W: Write, E: EnvSource>(
    out: &mut W,
    resolver: &PathResolver<E>,
    only: Option<DataResource>,
    json: bool,
) -> Result<()> {
    if let Some(resource) = only {
        let resolved = resolver.resolve(resource);
        if json {
            write_json(out, &resolved)?;
        } else {
            write_path(out, &resolved.path)?;
            writeln!(out)?;
        }
        return Ok(());
    }

    let all = resolver.resolve_all();
    if json {
        return write_json(out, &all);
    }

    for resolved in &all {
        write!(out, "{:<14} ", resolved.resource.label())?;
        write_path(out, &resolved.path)?;
        writeln!(out, " ({})", resolved.origin)?;
    }
    Ok(())
}

/// Serialize fully before writing, so a failure leaves `out` untouched.
fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .context("Cannot render as JSON (non-UTF-8 path?); use plain output")?;
    writeln!(out, "{}", rendered)?;
    Ok(())
}

/// Write a path byte-for-byte.
#[cfg(unix)]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    write!(out, "{}", path.display())
}

/// Print the status of each resource. Returns whether all are available.
pub fn show_status<W: Write, E: EnvSource>(
    out: &mut W,
    resolver: &PathResolver<E>,
    json: bool,
) -> Result<bool> {
    let report = DataDirReport::collect(resolver).context("Failed to probe data paths")?;

    if json {
        write_json(out, &report)?;
    } else {
        for status in &report.entries {
            writeln!(out, "{}", format_status(status))?;
        }
    }

    let available = report.all_available();
    if !available {
        info!(
            "Unavailable: {}",
            report
                .unavailable()
                .map(|s| s.resource.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(available)
}

fn format_status(status: &PathStatus) -> String {
    let state = match status.state {
        PathState::Present => "present".to_string(),
        PathState::Missing => "missing".to_string(),
        PathState::WrongKind { found } => format!("not a {} (found {})", status.expected, found),
    };

    let mut line = format!(
        "{:<14} {:<8} {} ({})",
        status.resource.label(),
        state,
        status.path.display(),
        status.origin
    );
    if let Some(size) = status.size_bytes {
        line.push_str(&format!(" {}", format_size(size)));
    }
    if status.large {
        line.push_str(" [large]");
    }
    line
}

/// Format a byte count for humans.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Print the effective settings, with data paths as resolved.
pub fn show_settings<W: Write, E: EnvSource>(
    out: &mut W,
    settings: &Settings,
    resolver: &PathResolver<E>,
    json: bool,
) -> Result<()> {
    let mut effective = settings.clone();
    for resolved in resolver.resolve_all() {
        effective.data.set(resolved.resource, resolved.path);
    }

    if json {
        write_json(out, &effective)?;
    } else {
        let rendered =
            toml::to_string_pretty(&effective).context("Failed to serialize settings")?;
        write!(out, "{}", rendered)?;
    }
    debug!("Printed effective settings");
    Ok(())
}

/// List every recognized variable and how it is set.
pub fn show_env<W: Write, E: EnvSource>(out: &mut W, env: &E) -> Result<()> {
    for name in vars::ALL {
        match env.var_os(name) {
            None => writeln!(out, "{} (unset)", name)?,
            Some(value) if value.is_empty() => writeln!(out, "{}= (empty, ignored)", name)?,
            Some(value) => writeln!(out, "{}={}", name, value.to_string_lossy())?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use datadir_types::MapEnv;
    use tempfile::TempDir;

    fn output<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn test_show_single_path() {
        let resolver = PathResolver::new(MapEnv::new().with("CHROMA_DB_PATH", "/mnt/vectors"));
        let text = output(|out| {
            show_paths(out, &resolver, Some(DataResource::VectorStore), false)
        });
        assert_eq!(text, "/mnt/vectors\n");
    }

    #[test]
    fn test_show_paths_lists_origin() {
        let resolver = PathResolver::new(MapEnv::new().with("JIRA_CSV_PATH", "/data/export.csv"));
        let text = output(|out| show_paths(out, &resolver, None, false));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("src/chroma_db (default)"));
        assert!(lines[1].contains("/data/export.csv (env JIRA_CSV_PATH)"));
    }

    #[test]
    fn test_show_paths_json() {
        let resolver = PathResolver::new(MapEnv::new());
        let text = output(|out| show_paths(out, &resolver, None, true));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["resource"], "vector-store");
        assert_eq!(value[0]["origin"], "default");
        assert_eq!(value[1]["path"], "src/data/JIRA_limpo.csv");
    }

    #[test]
    fn test_show_status_missing() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(MapEnv::new()).with_root(temp_dir.path());

        let mut buf = Vec::new();
        let available = show_status(&mut buf, &resolver, false).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(!available);
        assert_eq!(text.matches("missing").count(), 2);
    }

    #[test]
    fn test_show_env_marks_empty() {
        let env = MapEnv::new()
            .with("CHROMA_DB_PATH", "")
            .with("JIRA_CSV_PATH", "/data/export.csv");
        let text = output(|out| show_env(out, &env));
        assert!(text.contains("CHROMA_DB_PATH= (empty, ignored)"));
        assert!(text.contains("JIRA_CSV_PATH=/data/export.csv"));
        assert!(text.contains("BEDROCK_REGION (unset)"));
    }

    #[test]
    fn test_flags_override_env() {
        let cli = Cli::parse_from([
            "datadir",
            "paths",
            "--report-source-path",
            "/flag/export.csv",
        ]);
        let env = MapEnv::new().with("JIRA_CSV_PATH", "/env/export.csv");
        let settings = load_settings(&cli, &env).unwrap();
        let resolver = build_resolver(&cli, &settings, &env);

        assert_eq!(
            resolver.resolve(DataResource::ReportSource).path,
            PathBuf::from("/flag/export.csv")
        );
    }

    #[test]
    fn test_log_level_flag_overrides_settings() {
        let cli = Cli::parse_from(["datadir", "--log-level", "debug", "env"]);
        let env = MapEnv::new().with("DATADIR_LOG_LEVEL", "warn");
        let settings = load_settings(&cli, &env).unwrap();
        assert_eq!(settings.log_level, "debug");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_output() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/d\xffb");
        let resolver = PathResolver::new(MapEnv::new().with("CHROMA_DB_PATH", raw));

        let mut buf = Vec::new();
        show_paths(&mut buf, &resolver, Some(DataResource::VectorStore), false).unwrap();
        assert_eq!(buf, b"/d\xffb\n");

        let mut buf = Vec::new();
        assert!(show_paths(&mut buf, &resolver, None, true).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_wrong_kind_status_line() {
        let temp_dir = TempDir::new().unwrap();
        let export = temp_dir.path().join("export.csv");
        std::fs::create_dir_all(&export).unwrap();
        let resolver = PathResolver::new(MapEnv::new().with("JIRA_CSV_PATH", export.as_os_str()));

        let report = DataDirReport::collect(&resolver).unwrap();
        let line = format_status(report.get(DataResource::ReportSource).unwrap());
        assert!(line.contains("not a file (found directory)"));
    }

    #[test]
    fn test_check_settings_fatal_only_when_asked() {
        let cli = Cli::parse_from(["datadir", "paths"]);
        let env = MapEnv::new().with("BEDROCK_TEMPERATURE", "1.5");
        let settings = load_settings(&cli, &env).unwrap();

        assert!(check_settings(&settings, false).is_ok());
        assert!(check_settings(&settings, true).is_err());
    }

    #[test]
    fn test_startup_log_level() {
        let env = MapEnv::new().with("DATADIR_LOG_LEVEL", "warn");
        let cli = Cli::parse_from(["datadir", "env"]);
        assert_eq!(startup_log_level(&cli, &env), "warn");
        assert_eq!(startup_log_level(&cli, &MapEnv::new()), "info");

        let cli = Cli::parse_from(["datadir", "--log-level", "debug", "env"]);
        assert_eq!(startup_log_level(&cli, &env), "debug");
    }

    #[test]
    fn test_show_settings_uses_resolved_paths() {
        let env = MapEnv::new().with("CHROMA_DB_PATH", "/mnt/vectors");
        let settings = Settings::load_with_env(None, &env).unwrap();
        let resolver = settings.path_resolver(&env);

        let text = output(|out| show_settings(out, &settings, &resolver, false));
        assert!(text.contains("vector_store_path = \"/mnt/vectors\""));
        assert!(text.contains("report_source_path = \"src/data/JIRA_limpo.csv\""));
    }
}

//! Path resolution for data directory resources.
//!
//! A resource's override variable wins when it is set and non-empty; otherwise
//! the resource's fixed default is used. Override values are returned exactly
//! as given. Nothing here touches the filesystem.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::resource::{DataResource, ResourceKind};

/// Source of environment variables.
///
/// The process environment is the production source; tests use [`MapEnv`] so
/// they never mutate global state.
pub trait EnvSource {
    /// Raw value of `key`, if set.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Value of `key` if set and non-empty. An empty value counts as unset.
    fn non_empty(&self, key: &str) -> Option<OsString> {
        self.var_os(key).filter(|value| !value.is_empty())
    }

    /// Non-empty UTF-8 value of `key`.
    fn var(&self, key: &str) -> Option<String> {
        self.non_empty(key).and_then(|value| value.into_string().ok())
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var_os(&self, key: &str) -> Option<OsString> {
        (**self).var_os(key)
    }
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// In-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, OsString>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.vars.remove(key);
    }
}

impl<K: Into<String>, V: Into<OsString>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}

/// Where a resolved path came from, highest precedence first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum PathOrigin {
    /// Command-line flag
    Flag,
    /// Taken verbatim from an environment variable
    Env { var: &'static str },
    /// Config file passed by the operator
    ConfigFile,
    /// Fixed default (possibly anchored under a project root)
    Default,
}

impl fmt::Display for PathOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathOrigin::Flag => write!(f, "flag"),
            PathOrigin::Env { var } => write!(f, "env {}", var),
            PathOrigin::ConfigFile => write!(f, "config file"),
            PathOrigin::Default => write!(f, "default"),
        }
    }
}

/// A resource together with the path chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    pub resource: DataResource,
    pub path: PathBuf,
    #[serde(flatten)]
    pub origin: PathOrigin,
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource.kind()
    }

    /// True unless the fixed default was used.
    pub fn is_override(&self) -> bool {
        !matches!(self.origin, PathOrigin::Default)
    }

    /// Path with a leading `~` replaced by the home directory.
    ///
    /// For consumers that open the path. The resolved value itself is never
    /// rewritten.
    pub fn expanded(&self) -> PathBuf {
        expand_home(&self.path)
    }
}

/// Expand a leading `~` component to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    path.to_path_buf()
}

/// Resolves data directory resources against an environment.
///
/// Precedence, highest first: flag, environment variable, config file,
/// default. With no flag or config file layered in, resolution is exactly
/// "override if set and non-empty, else default".
#[derive(Debug, Clone)]
pub struct PathResolver<E = ProcessEnv> {
    env: E,
    root: Option<PathBuf>,
    flags: HashMap<DataResource, PathBuf>,
    configured: HashMap<DataResource, PathBuf>,
}

impl PathResolver<ProcessEnv> {
    pub fn from_process_env() -> Self {
        Self::new(ProcessEnv)
    }
}

impl<E: EnvSource> PathResolver<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            root: None,
            flags: HashMap::new(),
            configured: HashMap::new(),
        }
    }

    /// Anchor default paths under `root`. Overrides are left untouched.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Path from a config file. Loses to the environment variable.
    pub fn with_config_path(mut self, resource: DataResource, path: impl Into<PathBuf>) -> Self {
        self.configured.insert(resource, path.into());
        self
    }

    /// Path from a command-line flag. Wins over everything else.
    pub fn with_flag_path(mut self, resource: DataResource, path: impl Into<PathBuf>) -> Self {
        self.flags.insert(resource, path.into());
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Resolve one resource.
    pub fn resolve(&self, resource: DataResource) -> ResolvedPath {
        let var = resource.env_var();
        let (path, origin) = if let Some(path) = self.flags.get(&resource) {
            (path.clone(), PathOrigin::Flag)
        } else if let Some(value) = self.env.non_empty(var) {
            (PathBuf::from(value), PathOrigin::Env { var })
        } else if let Some(path) = self.configured.get(&resource) {
            (path.clone(), PathOrigin::ConfigFile)
        } else {
            (self.default_for(resource), PathOrigin::Default)
        };

        debug!(
            resource = %resource,
            path = %path.display(),
            origin = %origin,
            "Resolved data path"
        );

        ResolvedPath {
            resource,
            path,
            origin,
        }
    }

    /// Resolve every resource, in [`DataResource::ALL`] order.
    pub fn resolve_all(&self) -> Vec<ResolvedPath> {
        DataResource::ALL
            .iter()
            .map(|resource| self.resolve(*resource))
            .collect()
    }

    fn default_for(&self, resource: DataResource) -> PathBuf {
        match &self.root {
            Some(root) => root.join(resource.default_path()),
            None => resource.default_path().to_path_buf(),
        }
    }
}

/// Resolve `resource` against the process environment.
pub fn resolve_path(resource: DataResource) -> PathBuf {
    PathResolver::from_process_env().resolve(resource).path
}

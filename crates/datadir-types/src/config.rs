//! Settings loading for the data directory and its consumers.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The config file is only read when the operator names one; there is no
//! implicit location, so an unset override variable always means the default.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::env as vars;
use crate::error::DataDirError;
use crate::resolver::{EnvSource, PathResolver, ProcessEnv};
use crate::resource::DataResource;

/// Data directory locations set in a config file.
///
/// Unset fields fall through to the resource defaults. Environment overrides
/// are applied by [`PathResolver`], not stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_store_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_source_path: Option<PathBuf>,
}

impl DataPaths {
    pub fn get(&self, resource: DataResource) -> Option<&Path> {
        match resource {
            DataResource::VectorStore => self.vector_store_path.as_deref(),
            DataResource::ReportSource => self.report_source_path.as_deref(),
        }
    }

    pub fn set(&mut self, resource: DataResource, path: PathBuf) {
        match resource {
            DataResource::VectorStore => self.vector_store_path = Some(path),
            DataResource::ReportSource => self.report_source_path = Some(path),
        }
    }
}

/// Vector-store collection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreSettings {
    /// Collection holding the ticket embeddings
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

fn default_collection_name() -> String {
    "chamados_jira".to_string()
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            collection_name: default_collection_name(),
        }
    }
}

/// Similarity-grouping parameters for the summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySettings {
    /// Maximum embedding distance for two tickets to share a group.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,

    /// Groups smaller than this are dropped.
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: u32,

    /// Neighbors fetched per seed ticket.
    #[serde(default = "default_max_neighbors")]
    pub max_neighbors: u32,

    /// Groups kept in the report.
    #[serde(default = "default_max_clusters")]
    pub max_clusters: u32,
}

fn default_distance_threshold() -> f64 {
    1.0
}

fn default_min_cluster_size() -> u32 {
    3
}

fn default_max_neighbors() -> u32 {
    200
}

fn default_max_clusters() -> u32 {
    20
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            min_cluster_size: default_min_cluster_size(),
            max_neighbors: default_max_neighbors(),
            max_clusters: default_max_clusters(),
        }
    }
}

impl SummarySettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), DataDirError> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(DataDirError::invalid(
                "summary.distance_threshold",
                format!("must be a finite value >= 0, got {}", self.distance_threshold),
            ));
        }
        if self.min_cluster_size == 0 {
            return Err(DataDirError::invalid(
                "summary.min_cluster_size",
                "must be > 0",
            ));
        }
        if self.max_neighbors < self.min_cluster_size {
            return Err(DataDirError::invalid(
                "summary.max_neighbors",
                format!(
                    "must be >= min_cluster_size ({}), got {}",
                    self.min_cluster_size, self.max_neighbors
                ),
            ));
        }
        if self.max_clusters == 0 {
            return Err(DataDirError::invalid("summary.max_clusters", "must be > 0"));
        }
        Ok(())
    }
}

/// Hosted LLM settings for the report narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedrockSettings {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Sampling temperature (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Ask the model for structured (JSON) output.
    #[serde(default = "default_structured_output")]
    pub structured_output: bool,

    /// Log request and response bodies.
    #[serde(default)]
    pub debug: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_model_id() -> String {
    "anthropic.claude-3-5-sonnet-20240620-v1:0".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_max_tokens() -> u32 {
    1200
}

fn default_structured_output() -> bool {
    true
}

impl Default for BedrockSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            model_id: default_model_id(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            structured_output: default_structured_output(),
            debug: false,
        }
    }
}

impl BedrockSettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), DataDirError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(DataDirError::invalid(
                "bedrock.temperature",
                format!("must be 0.0-1.0, got {}", self.temperature),
            ));
        }
        if self.max_tokens == 0 {
            return Err(DataDirError::invalid("bedrock.max_tokens", "must be > 0"));
        }
        if self.model_id.trim().is_empty() {
            return Err(DataDirError::invalid("bedrock.model_id", "must not be empty"));
        }
        Ok(())
    }
}

/// Main settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub data: DataPaths,

    #[serde(default)]
    pub vector_store: VectorStoreSettings,

    #[serde(default)]
    pub summary: SummarySettings,

    #[serde(default)]
    pub bedrock: BedrockSettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data: DataPaths::default(),
            vector_store: VectorStoreSettings::default(),
            summary: SummarySettings::default(),
            bedrock: BedrockSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// 1. Built-in defaults
    /// 2. Config file, only if `config_path` is given
    /// 3. Environment variables
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(config_path: Option<&Path>) -> Result<Self, DataDirError> {
        Self::load_with_env(config_path, &ProcessEnv)
    }

    /// Same as [`Settings::load`] with an explicit environment.
    pub fn load_with_env<E: EnvSource>(
        config_path: Option<&Path>,
        env: &E,
    ) -> Result<Self, DataDirError> {
        let settings = Self::load_layers(config_path, env)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply defaults, the config file and `env` without validating.
    ///
    /// A malformed config file is still an error. Out-of-range values are
    /// left for [`Settings::validate`], so callers that only need data paths
    /// are not blocked by unrelated report settings.
    pub fn load_layers<E: EnvSource>(
        config_path: Option<&Path>,
        env: &E,
    ) -> Result<Self, DataDirError> {
        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())?
            .set_default("vector_store.collection_name", default_collection_name())?
            .set_default("summary.distance_threshold", default_distance_threshold())?
            .set_default("summary.min_cluster_size", default_min_cluster_size() as i64)?
            .set_default("summary.max_neighbors", default_max_neighbors() as i64)?
            .set_default("summary.max_clusters", default_max_clusters() as i64)?
            .set_default("bedrock.region", default_region())?
            .set_default("bedrock.model_id", default_model_id())?
            .set_default("bedrock.temperature", default_temperature())?
            .set_default("bedrock.max_tokens", default_max_tokens() as i64)?
            .set_default("bedrock.structured_output", default_structured_output())?
            .set_default("bedrock.debug", false)?;

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(DataDirError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_env(env);
        Ok(settings)
    }

    /// Apply environment overrides on top of the current values.
    ///
    /// Empty variables are ignored. Numeric variables that fail to parse keep
    /// the current value and log a warning.
    pub fn apply_env<E: EnvSource>(&mut self, env: &E) {
        override_string(env, vars::logging::LOG_LEVEL, &mut self.log_level);

        override_string(
            env,
            vars::vector_store::COLLECTION_NAME,
            &mut self.vector_store.collection_name,
        );

        override_parsed(
            env,
            vars::summary::DISTANCE_THRESHOLD,
            &mut self.summary.distance_threshold,
        );
        override_parsed(
            env,
            vars::summary::MIN_CLUSTER_SIZE,
            &mut self.summary.min_cluster_size,
        );
        override_parsed(
            env,
            vars::summary::MAX_NEIGHBORS,
            &mut self.summary.max_neighbors,
        );
        override_parsed(
            env,
            vars::summary::MAX_CLUSTERS,
            &mut self.summary.max_clusters,
        );

        override_string(env, vars::bedrock::REGION, &mut self.bedrock.region);
        override_string(env, vars::bedrock::MODEL_ID, &mut self.bedrock.model_id);
        override_parsed(
            env,
            vars::bedrock::TEMPERATURE,
            &mut self.bedrock.temperature,
        );
        override_parsed(env, vars::bedrock::MAX_TOKENS, &mut self.bedrock.max_tokens);
        override_flag(
            env,
            vars::bedrock::STRUCTURED_OUTPUT,
            &mut self.bedrock.structured_output,
        );
        override_flag(env, vars::bedrock::DEBUG, &mut self.bedrock.debug);
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), DataDirError> {
        if self.vector_store.collection_name.trim().is_empty() {
            return Err(DataDirError::invalid(
                "vector_store.collection_name",
                "must not be empty",
            ));
        }
        self.summary.validate()?;
        self.bedrock.validate()?;
        Ok(())
    }

    /// Build a resolver that layers this file's data paths under `env`.
    pub fn path_resolver<E: EnvSource>(&self, env: E) -> PathResolver<E> {
        DataResource::ALL
            .iter()
            .fold(PathResolver::new(env), |resolver, resource| {
                match self.data.get(*resource) {
                    Some(path) => resolver.with_config_path(*resource, path),
                    None => resolver,
                }
            })
    }
}

fn override_string<E: EnvSource>(env: &E, key: &str, target: &mut String) {
    if let Some(value) = env.var(key) {
        *target = value;
    }
}

fn override_parsed<E, T>(env: &E, key: &str, target: &mut T)
where
    E: EnvSource,
    T: FromStr + Display,
{
    let Some(raw) = env.var(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => warn!(
            "Ignoring {}={:?}: not a valid number, keeping {}",
            key, raw, target
        ),
    }
}

fn override_flag<E: EnvSource>(env: &E, key: &str, target: &mut bool) {
    if let Some(raw) = env.var(key) {
        *target = parse_flag(&raw);
    }
}

/// `1`, `true` and `yes` (any case) are true; everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

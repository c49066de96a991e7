//! The resources that live in the data directory.
//!
//! Neither resource is owned here: the vector store is written by an external
//! embedding database and the CSV is produced by an issue-tracker export. This
//! module only names them, their override variables and their defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::env::data as env_data;
use crate::error::DataDirError;

/// Default vector-store persistence directory, relative to the project root.
pub const DEFAULT_VECTOR_STORE_PATH: &str = "src/chroma_db";

/// Default report-enrichment CSV, relative to the project root.
pub const DEFAULT_REPORT_SOURCE_PATH: &str = "src/data/JIRA_limpo.csv";

/// What kind of filesystem entry a resource is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Directory,
    File,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Directory => write!(f, "directory"),
            ResourceKind::File => write!(f, "file"),
        }
    }
}

/// A named resource in the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataResource {
    /// Embedding database persistence directory
    VectorStore,
    /// Tabular export used to enrich generated reports
    ReportSource,
}

impl DataResource {
    /// Every resource, in display order.
    pub const ALL: [DataResource; 2] = [DataResource::VectorStore, DataResource::ReportSource];

    /// Environment variable that overrides this resource's location.
    pub fn env_var(self) -> &'static str {
        match self {
            DataResource::VectorStore => env_data::CHROMA_DB_PATH,
            DataResource::ReportSource => env_data::JIRA_CSV_PATH,
        }
    }

    /// Fixed relative location used when no override is set.
    pub fn default_path(self) -> &'static Path {
        match self {
            DataResource::VectorStore => Path::new(DEFAULT_VECTOR_STORE_PATH),
            DataResource::ReportSource => Path::new(DEFAULT_REPORT_SOURCE_PATH),
        }
    }

    pub fn kind(self) -> ResourceKind {
        match self {
            DataResource::VectorStore => ResourceKind::Directory,
            DataResource::ReportSource => ResourceKind::File,
        }
    }

    /// Human-readable label for diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            DataResource::VectorStore => "Vector store",
            DataResource::ReportSource => "Report source",
        }
    }
}

impl fmt::Display for DataResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataResource::VectorStore => write!(f, "vector-store"),
            DataResource::ReportSource => write!(f, "report-source"),
        }
    }
}

impl FromStr for DataResource {
    type Err = DataDirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "vector-store" | "chroma" => Ok(DataResource::VectorStore),
            "report-source" | "jira-csv" => Ok(DataResource::ReportSource),
            _ => Err(DataDirError::UnknownResource(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_vars() {
        assert_eq!(DataResource::VectorStore.env_var(), "CHROMA_DB_PATH");
        assert_eq!(DataResource::ReportSource.env_var(), "JIRA_CSV_PATH");
    }

    #[test]
    fn test_defaults_are_relative() {
        for resource in DataResource::ALL {
            assert!(resource.default_path().is_relative());
        }
        assert_eq!(
            DataResource::ReportSource.default_path(),
            Path::new("src/data/JIRA_limpo.csv")
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(DataResource::VectorStore.kind(), ResourceKind::Directory);
        assert_eq!(DataResource::ReportSource.kind(), ResourceKind::File);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(
            "vector-store".parse::<DataResource>().unwrap(),
            DataResource::VectorStore
        );
        assert_eq!(
            "Chroma".parse::<DataResource>().unwrap(),
            DataResource::VectorStore
        );
        assert_eq!(
            "jira_csv".parse::<DataResource>().unwrap(),
            DataResource::ReportSource
        );
        assert!(matches!(
            "postgres".parse::<DataResource>(),
            Err(DataDirError::UnknownResource(_))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for resource in DataResource::ALL {
            assert_eq!(resource.to_string().parse::<DataResource>().unwrap(), resource);
        }
    }
}

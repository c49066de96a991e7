//! # datadir-types
//!
//! Location contract for the report data directory.
//!
//! The directory holds two resources owned by external systems:
//! - Vector store: persistence directory of the embedding database
//!   (`CHROMA_DB_PATH`, default `src/chroma_db`)
//! - Report source: CSV export used to enrich reports
//!   (`JIRA_CSV_PATH`, default `src/data/JIRA_limpo.csv`)
//!
//! ## Usage
//!
//! ```rust
//! use datadir_types::{resolve_path, DataResource};
//!
//! let csv = resolve_path(DataResource::ReportSource);
//! println!("reading {}", csv.display());
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod resolver;
pub mod resource;
pub mod status;

pub use config::{BedrockSettings, DataPaths, Settings, SummarySettings, VectorStoreSettings};
pub use error::DataDirError;
pub use resolver::{
    expand_home, resolve_path, EnvSource, MapEnv, PathOrigin, PathResolver, ProcessEnv,
    ResolvedPath,
};
pub use resource::{DataResource, ResourceKind};
pub use status::{probe, DataDirReport, EntryKind, PathState, PathStatus};

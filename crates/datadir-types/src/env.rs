//! Environment variable names recognized by the data directory.
//!
//! Every variable the workspace reads is declared here so the resolver, the
//! settings loader and the `datadir env` command agree on spelling.

/// Data directory resource overrides
pub mod data {
    /// Vector-store persistence directory
    pub const CHROMA_DB_PATH: &str = "CHROMA_DB_PATH";

    /// CSV export used for report enrichment
    pub const JIRA_CSV_PATH: &str = "JIRA_CSV_PATH";
}

/// Vector-store collection settings
pub mod vector_store {
    pub const COLLECTION_NAME: &str = "CHROMA_COLLECTION_NAME";
}

/// Similarity-grouping settings consumed by the summary report
pub mod summary {
    pub const DISTANCE_THRESHOLD: &str = "SUMMARY_DISTANCE_THRESHOLD";
    pub const MIN_CLUSTER_SIZE: &str = "SUMMARY_MIN_CLUSTER_SIZE";
    pub const MAX_NEIGHBORS: &str = "SUMMARY_MAX_NEIGHBORS";
    pub const MAX_CLUSTERS: &str = "SUMMARY_MAX_CLUSTERS";
}

/// Hosted LLM settings consumed by the report narrative
pub mod bedrock {
    pub const REGION: &str = "BEDROCK_REGION";
    pub const MODEL_ID: &str = "BEDROCK_MODEL_ID";
    pub const TEMPERATURE: &str = "BEDROCK_TEMPERATURE";
    pub const MAX_TOKENS: &str = "BEDROCK_MAX_TOKENS";
    pub const STRUCTURED_OUTPUT: &str = "BEDROCK_STRUCTURED_OUTPUT";
    pub const DEBUG: &str = "BEDROCK_DEBUG";
}

/// Logging configuration
pub mod logging {
    /// Log level used when `RUST_LOG` is not set
    pub const LOG_LEVEL: &str = "DATADIR_LOG_LEVEL";
}

/// All recognized variables, in display order.
pub const ALL: &[&str] = &[
    data::CHROMA_DB_PATH,
    data::JIRA_CSV_PATH,
    vector_store::COLLECTION_NAME,
    summary::DISTANCE_THRESHOLD,
    summary::MIN_CLUSTER_SIZE,
    summary::MAX_NEIGHBORS,
    summary::MAX_CLUSTERS,
    bedrock::REGION,
    bedrock::MODEL_ID,
    bedrock::TEMPERATURE,
    bedrock::MAX_TOKENS,
    bedrock::STRUCTURED_OUTPUT,
    bedrock::DEBUG,
    logging::LOG_LEVEL,
];

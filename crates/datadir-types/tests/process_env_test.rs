//! Resolution against the real process environment.
//!
//! Kept in its own test binary: it mutates `JIRA_CSV_PATH` with
//! `std::env::set_var`, and integration test files run as separate processes.
//! Add nothing here that reads the process environment in parallel; other
//! tests use `MapEnv`.

use std::path::PathBuf;

use datadir_types::{resolve_path, DataResource};

#[test]
fn test_process_environment() {
    std::env::remove_var("JIRA_CSV_PATH");
    assert_eq!(
        resolve_path(DataResource::ReportSource),
        PathBuf::from("src/data/JIRA_limpo.csv")
    );

    std::env::set_var("JIRA_CSV_PATH", "/tmp/process-export.csv");
    assert_eq!(
        resolve_path(DataResource::ReportSource),
        PathBuf::from("/tmp/process-export.csv")
    );

    std::env::set_var("JIRA_CSV_PATH", "");
    assert_eq!(
        resolve_path(DataResource::ReportSource),
        PathBuf::from("src/data/JIRA_limpo.csv")
    );
    std::env::remove_var("JIRA_CSV_PATH");
}

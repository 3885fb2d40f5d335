use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::consumer::WorkerConfig;
use crate::database::ResultStatus;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file path; ":memory:" opens an in-memory database.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Result statuses the worker accepts as success.
    #[serde(default = "default_acceptable_statuses")]
    pub acceptable_statuses: Vec<ResultStatus>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            acceptable_statuses: default_acceptable_statuses(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("querydesk.db")
}

fn default_acceptable_statuses() -> Vec<ResultStatus> {
    vec![ResultStatus::CommandOk, ResultStatus::RowsReturned]
}

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Pending-queue capacity; exceeding it yields a `Busy` ticket
    /// (0 = unlimited).
    #[serde(default)]
    pub max_pending: usize,
}

/// Config view for logging and status responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub database: SanitizedDatabaseConfig,
    pub worker: WorkerConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDatabaseConfig {
    pub path: String,
    pub acceptable_statuses: Vec<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            database: SanitizedDatabaseConfig {
                path: config.database.path.display().to_string(),
                acceptable_statuses: config
                    .database
                    .acceptable_statuses
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            },
            worker: config.worker.clone(),
            engine: config.engine.clone(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::model::task::{STATUS_IN_PROGRESS, STATUS_PENDING};

/// Configuration from tareas.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Document path, relative to the workspace directory
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Used when a request asks for a non-positive page size
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Status filter applied when a request names none
    #[serde(default = "default_statuses")]
    pub default_statuses: Vec<String>,
    /// Status given to new tasks created without one
    #[serde(default = "default_status")]
    pub default_status: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            page_size: default_page_size(),
            default_statuses: default_statuses(),
            default_status: default_status(),
        }
    }
}

pub const DEFAULT_STORE_FILE: &str = "tareas.json";
pub const DEFAULT_PAGE_SIZE: usize = 10;

fn default_store_file() -> String {
    DEFAULT_STORE_FILE.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_statuses() -> Vec<String> {
    vec![STATUS_PENDING.to_string(), STATUS_IN_PROGRESS.to_string()]
}

fn default_status() -> String {
    STATUS_PENDING.to_string()
}

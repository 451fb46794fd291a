use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store::TaskStore;
use crate::model::config::TrackerConfig;

pub const CONFIG_FILE: &str = "tareas.toml";

/// Error type for reading tareas.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse tareas.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read the workspace config. A missing file yields the defaults.
pub fn read_config(dir: &Path) -> Result<TrackerConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(TrackerConfig::default());
    }
    let config_text = fs::read_to_string(&config_path).map_err(|e| ConfigError::Read {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&config_text)?)
}

/// Open the task document named by the config, relative to `dir`.
pub fn open_store(dir: &Path, config: &TrackerConfig) -> TaskStore {
    TaskStore::new(dir.join(&config.store.file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.query.page_size, 10);
        assert_eq!(
            open_store(tmp.path(), &config).path(),
            tmp.path().join("tareas.json")
        );
    }

    #[test]
    fn config_overrides_store_and_query() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[store]
file = "data/tasks.json"

[query]
page_size = 5
default_statuses = ["Pending"]
"#,
        )
        .unwrap();

        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.query.page_size, 5);
        assert_eq!(config.query.default_statuses, vec!["Pending"]);
        assert_eq!(config.query.default_status, "Pending");
        assert_eq!(
            open_store(tmp.path(), &config).path(),
            tmp.path().join("data/tasks.json")
        );
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[query\npage_size = ").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}

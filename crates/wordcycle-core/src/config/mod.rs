//! Configuration system for wordcycle.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{TrackerError, TrackerResult};
use crate::store::SqliteRecordStore;
use crate::tracker::PracticeTracker;
use crate::traits::DayBoundary;

/// Main tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Path to the SQLite database.
    pub database_path: PathBuf,
    /// Use an in-memory database instead of `database_path`.
    pub in_memory: bool,
    /// Calendar used to decide what "today" is.
    pub day_boundary: DayBoundary,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|h| h.join(".wordcycle"))
            .unwrap_or_else(|| PathBuf::from(".wordcycle"));

        Self {
            database_path: data_dir.join("wordcycle.db"),
            in_memory: false,
            day_boundary: DayBoundary::default(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> TrackerResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| TrackerError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| TrackerError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| TrackerError::Configuration(e.to_string())),
            _ => Err(TrackerError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `WORDCYCLE_DB_PATH`
    /// - `WORDCYCLE_IN_MEMORY` (any value enables it)
    /// - `WORDCYCLE_DAY_BOUNDARY` (`utc` or `local`)
    pub fn from_env() -> TrackerResult<Self> {
        Self::default().merge_env()
    }

    /// Override fields with any `WORDCYCLE_*` variables that are set.
    pub fn merge_env(mut self) -> TrackerResult<Self> {
        if let Ok(path) = std::env::var("WORDCYCLE_DB_PATH") {
            self.database_path = PathBuf::from(path);
        }

        if std::env::var("WORDCYCLE_IN_MEMORY").is_ok() {
            self.in_memory = true;
        }

        if let Ok(boundary) = std::env::var("WORDCYCLE_DAY_BOUNDARY") {
            self.day_boundary = boundary.parse().map_err(TrackerError::Configuration)?;
        }

        Ok(self)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }

    /// Open the configured SQLite record store.
    pub fn open_store(&self) -> TrackerResult<SqliteRecordStore> {
        if self.in_memory {
            SqliteRecordStore::in_memory()
        } else {
            SqliteRecordStore::new(&self.database_path)
        }
    }

    /// Open the store and wrap it in a tracker using the wall clock.
    pub fn open_tracker(&self) -> TrackerResult<PracticeTracker> {
        let store = Arc::new(self.open_store()?);
        Ok(PracticeTracker::with_system_clock(store, self.day_boundary))
    }
}

/// Builder for TrackerConfig.
#[derive(Default)]
pub struct TrackerConfigBuilder {
    config: TrackerConfig,
}

impl TrackerConfigBuilder {
    /// Set database path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database_path = path.into();
        self
    }

    /// Use an in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.config.in_memory = true;
        self
    }

    /// Set the day boundary.
    pub fn day_boundary(mut self, boundary: DayBoundary) -> Self {
        self.config.day_boundary = boundary;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> TrackerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_path_under_data_dir() {
        let config = TrackerConfig::default();
        assert!(config.database_path.ends_with(".wordcycle/wordcycle.db"));
        assert!(!config.in_memory);
        assert_eq!(config.day_boundary, DayBoundary::Utc);
    }

    #[test]
    fn test_from_toml() {
        let (_dir, path) = write_config(
            "wordcycle.toml",
            "database_path = \"/tmp/words.db\"\nday_boundary = \"local\"\n",
        );
        let config = TrackerConfig::from_file(&path).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/words.db"));
        assert_eq!(config.day_boundary, DayBoundary::Local);
        assert!(!config.in_memory);
    }

    #[test]
    fn test_from_json_and_yaml() {
        let (_dir, json) = write_config("wordcycle.json", r#"{"in_memory": true}"#);
        assert!(TrackerConfig::from_file(&json).unwrap().in_memory);

        let (_dir, yaml) = write_config("wordcycle.yaml", "day_boundary: local\n");
        assert_eq!(
            TrackerConfig::from_file(&yaml).unwrap().day_boundary,
            DayBoundary::Local
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let (_dir, path) = write_config("wordcycle.ini", "x=1");
        let err = TrackerConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, TrackerError::Configuration(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let (_dir, path) = write_config("wordcycle.toml", "day_boundary = \"mars\"");
        assert!(matches!(
            TrackerConfig::from_file(&path).unwrap_err(),
            TrackerError::Configuration(_)
        ));
    }

    #[test]
    fn test_env_overrides() {
        const VARS: [&str; 3] = [
            "WORDCYCLE_DB_PATH",
            "WORDCYCLE_IN_MEMORY",
            "WORDCYCLE_DAY_BOUNDARY",
        ];
        for var in VARS {
            std::env::remove_var(var);
        }

        std::env::set_var("WORDCYCLE_DB_PATH", "/tmp/env-words.db");
        std::env::set_var("WORDCYCLE_IN_MEMORY", "1");
        std::env::set_var("WORDCYCLE_DAY_BOUNDARY", "Local");
        let config = TrackerConfig::from_env().unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/env-words.db"));
        assert!(config.in_memory);
        assert_eq!(config.day_boundary, DayBoundary::Local);

        // Unset variables keep the file values
        std::env::remove_var("WORDCYCLE_DB_PATH");
        std::env::remove_var("WORDCYCLE_IN_MEMORY");
        let from_file = TrackerConfig::builder()
            .database_path("/srv/file.db")
            .build()
            .merge_env()
            .unwrap();
        assert_eq!(from_file.database_path, PathBuf::from("/srv/file.db"));
        assert!(!from_file.in_memory);
        assert_eq!(from_file.day_boundary, DayBoundary::Local);

        std::env::set_var("WORDCYCLE_DAY_BOUNDARY", "mars");
        let err = TrackerConfig::from_env().unwrap_err();
        assert!(matches!(err, TrackerError::Configuration(_)));
        assert_eq!(err.code(), crate::error::ErrorCode::Configuration);

        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_builder() {
        let config = TrackerConfig::builder()
            .database_path("/var/lib/wordcycle.db")
            .day_boundary(DayBoundary::Local)
            .in_memory()
            .build();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/wordcycle.db"));
        assert_eq!(config.day_boundary, DayBoundary::Local);
        assert!(config.in_memory);
    }

    #[test]
    fn test_open_in_memory_store() {
        let config = TrackerConfig::builder().in_memory().build();
        assert!(config.open_store().is_ok());
    }
}

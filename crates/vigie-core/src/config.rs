use crate::error::VigieError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides `tables_dir` when set.
pub const TABLES_DIR_ENV: &str = "VIGIE_TABLES_DIR";

pub const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 15;
pub const MIN_ENRICHMENT_TIMEOUT_SECS: u64 = 10;
pub const MAX_ENRICHMENT_TIMEOUT_SECS: u64 = 30;

/// Engine configuration, loaded from a JSON file. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the JSON tables. Built-in tables when absent.
    pub tables_dir: Option<PathBuf>,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: DEFAULT_ENRICHMENT_TIMEOUT_SECS,
        }
    }
}

impl EnrichmentConfig {
    /// Enrichment deadline, clamped to 10-30 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .clamp(MIN_ENRICHMENT_TIMEOUT_SECS, MAX_ENRICHMENT_TIMEOUT_SECS),
        )
    }
}

impl EngineConfig {
    /// Apply environment overrides.
    pub fn with_env(mut self) -> Self {
        if let Some(dir) = std::env::var_os(TABLES_DIR_ENV).filter(|v| !v.is_empty()) {
            self.tables_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

/// Load configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, VigieError> {
    let content = std::fs::read_to_string(path).map_err(|e| VigieError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| VigieError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.enrichment.enabled);
        assert_eq!(config.enrichment.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_timeout_clamped() {
        let short = EnrichmentConfig {
            enabled: true,
            timeout_secs: 2,
        };
        let long = EnrichmentConfig {
            enabled: true,
            timeout_secs: 300,
        };
        assert_eq!(short.timeout(), Duration::from_secs(10));
        assert_eq!(long.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "tables_dir": "/srv/vigie/rules", "enrichment": {{ "enabled": true }} }}"#
        )
        .unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tables_dir, Some(PathBuf::from("/srv/vigie/rules")));
        assert!(config.enrichment.enabled);
        assert_eq!(config.enrichment.timeout_secs, 15);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(VigieError::Config { .. })
        ));
        assert!(matches!(
            load_config(Path::new("/nonexistent/vigie.json")),
            Err(VigieError::Config { .. })
        ));
    }
}

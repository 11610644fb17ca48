pub mod analyze;
pub mod detect;
pub mod tables;

use std::path::{Path, PathBuf};
use vigie_core::config::{load_config, EngineConfig};
use vigie_core::error::VigieError;
use vigie_core::model::ProductInput;
use vigie_core::Analyzer;

/// Options shared by every subcommand.
pub struct Settings {
    pub config: Option<PathBuf>,
    pub tables: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    /// Config file (or defaults), then `VIGIE_TABLES_DIR`, then `--tables`.
    pub fn engine_config(&self) -> Result<EngineConfig, VigieError> {
        let config = match &self.config {
            Some(path) => load_config(path)?,
            None => EngineConfig::default(),
        };
        let mut config = config.with_env();
        if let Some(dir) = &self.tables {
            config.tables_dir = Some(dir.clone());
        }
        Ok(config)
    }

    pub fn analyzer(&self) -> Result<Analyzer, VigieError> {
        Analyzer::from_config(self.engine_config()?)
    }
}

/// Read one product object, or an array of them, from a JSON file.
pub fn read_products(path: &Path) -> Result<Vec<ProductInput>, VigieError> {
    let bytes = std::fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    let products = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(products)
}

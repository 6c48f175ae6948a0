use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tsp_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};

pub const DEFAULT_TABLE_PREFIX: &str = "TSP_lookup_";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,
  /// Prepended to `songs` to form the table name.
  #[serde(default = "default_table_prefix")]
  pub table_prefix: String,
}

fn default_table_prefix() -> String {
  DEFAULT_TABLE_PREFIX.to_string()
}

impl Default for StorageConfig {
  fn default() -> Self {
    let db_path = PATHS.data_dir.join("tsp_lookup.db");
    StorageConfig { db_path, journal_mode: Some("WAL".to_string()), table_prefix: default_table_prefix() }
  }
}

impl StorageConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("storage")?;
    CONFIG_BACKEND.save_section("storage", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("storage", self)
  }
}

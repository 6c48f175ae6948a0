use serde::{Deserialize, Serialize};
use tsp_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use tsp_core::services::TSP_TOPIC;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LookupConfig {
  /// Topic whose outputs are indexed; notifications for any other topic are ignored.
  #[serde(default = "default_topic")]
  pub topic: String,
}

fn default_topic() -> String {
  TSP_TOPIC.to_string()
}

impl Default for LookupConfig {
  fn default() -> Self {
    LookupConfig { topic: default_topic() }
  }
}

impl LookupConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("lookup")?;
    CONFIG_BACKEND.save_section("lookup", &cfg)?;
    Ok(cfg)
  }
}

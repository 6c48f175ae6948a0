use serde::{Deserialize, Serialize};
use tsp_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};

use crate::mapping::FieldEncoding;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct PushDropConfig {
  /// Text encoding applied to every song field before it is stored.
  #[serde(default)]
  pub field_encoding: FieldEncoding,
}

impl PushDropConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("pushdrop")?;
    CONFIG_BACKEND.save_section("pushdrop", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("pushdrop", self)
  }
}

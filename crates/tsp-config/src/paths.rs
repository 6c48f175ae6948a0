use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

const BASE_DIR_ENV: &str = "TSP_BASE_DIR";
const CONFIG_FILE_NAME: &str = "tsp-lookup.toml";

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "tempo";
const APPLICATION: &str = "tsp-lookup";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Directories the lookup service reads config from and keeps its database in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TspPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl TspPaths {
  /// Resolves the layout and creates every directory in it.
  pub fn new() -> Result<Self, ConfigError> {
    let paths = match std::env::var_os(BASE_DIR_ENV) {
      Some(base) => Self::portable(PathBuf::from(base)),
      None => Self::platform()?,
    };
    paths.ensure_dirs()?;
    Ok(paths)
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  /// Everything under one directory, for `TSP_BASE_DIR` setups.
  fn portable(base: PathBuf) -> Self {
    Self {
      config_dir: base.join("config"),
      data_dir: base.join("data"),
      cache_dir: base.join("cache"),
      base_dir: base,
    }
  }

  /// The platform's per-user locations.
  fn platform() -> Result<Self, ConfigError> {
    let dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(ConfigError::Directories)?;
    Ok(Self {
      base_dir: dirs.config_dir().to_path_buf(),
      config_dir: dirs.config_dir().to_path_buf(),
      data_dir: dirs.data_dir().to_path_buf(),
      cache_dir: dirs.cache_dir().to_path_buf(),
    })
  }

  fn ensure_dirs(&self) -> Result<(), ConfigError> {
    for dir in [&self.config_dir, &self.data_dir, &self.cache_dir] {
      std::fs::create_dir_all(dir)?;
    }
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }
}

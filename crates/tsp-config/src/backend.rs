use crate::io::atomic_write_str;
use crate::paths::{ConfigError, TspPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;

// toml_edit keeps user comments and ordering when a section is written back
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

/// Config backend over a single `tsp-lookup.toml` where every adapter owns one top-level table.
pub struct TomlConfigBackend {
  paths: TspPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: TspPaths) -> Self {
    Self { paths }
  }

  /// Like [`ConfigBackend::load_section`], but a missing file or missing table yields `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    decode_section(section, table.clone())
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, table: toml::Value) -> Result<T, ConfigError> {
  table.try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", path)))?;

    decode_section(section, table.clone())
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // `toml::to_string` gives a headerless "key = value" body; reparse it as a table item.
    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    doc[section] = section_item;

    atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::{TempDir, tempdir};

  #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
  struct Sample {
    topic: String,
    retries: Option<u32>,
  }

  fn backend_in(tmp: &TempDir) -> TomlConfigBackend {
    let base = tmp.path().to_path_buf();
    let paths = TspPaths {
      base_dir: base.clone(),
      config_dir: base.clone(),
      data_dir: base.join("data"),
      cache_dir: base.join("cache"),
    };
    TomlConfigBackend::new(paths)
  }

  #[test]
  fn missing_file_falls_back_to_default() {
    let tmp = tempdir().unwrap();
    let backend = backend_in(&tmp);

    let loaded: Sample = backend.load_section_with_default("lookup").unwrap();
    assert_eq!(loaded, Sample::default());

    assert!(backend.load_section::<Sample>("lookup").is_err());
  }

  #[test]
  fn save_then_load_section() {
    let tmp = tempdir().unwrap();
    let backend = backend_in(&tmp);
    let value = Sample { topic: "TSP".into(), retries: Some(3) };

    backend.save_section("lookup", &value).unwrap();

    let loaded: Sample = backend.load_section("lookup").unwrap();
    assert_eq!(loaded, value);
  }

  #[test]
  fn save_keeps_other_sections_and_comments() {
    let tmp = tempdir().unwrap();
    let backend = backend_in(&tmp);
    let path = tmp.path().join("tsp-lookup.toml");
    fs::write(&path, "# hand written\n[storage]\ntable_prefix = \"custom_\"\n").unwrap();

    backend.save_section("lookup", &Sample { topic: "TSP".into(), retries: None }).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("# hand written"));
    assert!(written.contains("table_prefix = \"custom_\""));

    let loaded: Sample = backend.load_section("lookup").unwrap();
    assert_eq!(loaded.topic, "TSP");
  }
}

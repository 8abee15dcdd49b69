//! Value bindings loaded from a YAML or JSON document.
//!
//! ```yaml
//! version: 1
//! values:
//!   port: 8080
//!   db_settings:
//!     url: "postgres://localhost/app"
//!     logger: "@inject:logger"
//! singletons: [db_settings]
//! ```
//!
//! Scalars are bound as primitives and objects as config objects, so
//! `@inject:` markers inside them are honoured at resolution time.

use crate::binding::{json_kind, Binding, Dependency};
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const SUPPORTED_VERSION: u32 = 1;

fn default_version() -> u32 {
  SUPPORTED_VERSION
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
  #[serde(default = "default_version")]
  pub version: u32,
  #[serde(default)]
  pub values: BTreeMap<String, serde_json::Value>,
  /// Aliases from `values` to register as singletons.
  #[serde(default)]
  pub singletons: Vec<String>,
}

impl ContainerConfig {
  pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
    serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
  }

  pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
  }

  /// Reads a config file. Files ending in `.json` are parsed as JSON,
  /// everything else as YAML.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let is_json = path
      .extension()
      .map(|ext| ext.eq_ignore_ascii_case("json"))
      .unwrap_or(false);
    if is_json {
      Self::from_json_str(&text)
    } else {
      Self::from_yaml_str(&text)
    }
  }

  /// The bindings described by this config, in alias order.
  pub fn bindings(&self) -> Result<Vec<Binding>, ConfigError> {
    if self.version != SUPPORTED_VERSION {
      return Err(ConfigError::UnsupportedVersion(self.version));
    }
    if let Some(missing) = self
      .singletons
      .iter()
      .find(|alias| !self.values.contains_key(alias.as_str()))
    {
      return Err(ConfigError::UnknownSingleton(missing.clone()));
    }

    self
      .values
      .iter()
      .map(|(alias, value)| {
        let dependency =
          Dependency::from_json(value.clone()).map_err(|_| ConfigError::UnsupportedValue {
            alias: alias.clone(),
            found: json_kind(value),
          })?;
        let mut binding = Binding::new(alias.as_str(), dependency);
        binding.singleton = self.singletons.contains(alias);
        Ok(binding)
      })
      .collect()
  }
}

//! The `@inject:` marker carried by config objects.
//!
//! A top-level string field of a config object whose text contains
//! `@inject:<alias>` is replaced, at resolution time, by the resolved value
//! of `<alias>`. Everything after the marker is the alias. Nested objects and
//! arrays are not scanned.

use crate::binding::ConfigObject;
use crate::error::Result;
use crate::value::{ConfigValue, ResolvedConfig, Value};
use std::collections::BTreeMap;

pub const INJECT_MARKER: &str = "@inject:";

/// The alias referenced by `text`, if it carries the marker.
pub fn injected_alias(text: &str) -> Option<&str> {
  text
    .find(INJECT_MARKER)
    .map(|start| &text[start + INJECT_MARKER.len()..])
}

/// Builds the marker text for `alias`.
pub fn inject_ref(alias: &str) -> String {
  format!("{}{}", INJECT_MARKER, alias)
}

/// Produces a resolved copy of `object`, calling `resolve` once per marker
/// field in key order. The first failure aborts the transform.
pub(crate) fn inject_config<F>(object: &ConfigObject, mut resolve: F) -> Result<ResolvedConfig>
where
  F: FnMut(&str) -> Result<Value>,
{
  let mut fields = BTreeMap::new();
  for (key, value) in object {
    let field = match value.as_str().and_then(injected_alias) {
      Some(alias) => ConfigValue::Injected(resolve(alias)?),
      None => ConfigValue::Json(value.clone()),
    };
    fields.insert(key.clone(), field);
  }
  Ok(ResolvedConfig::from_fields(fields))
}

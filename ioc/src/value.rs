//! Resolved values and the argument list handed to constructors.

use crate::binding::Primitive;
use crate::error::ArgError;
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A constructed, type-erased instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// The result of resolving an alias.
#[derive(Clone)]
pub enum Value {
  Primitive(Primitive),
  Config(Arc<ResolvedConfig>),
  Instance(Instance),
}

impl Value {
  /// Wraps `value` as an instance.
  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    Value::Instance(Arc::new(value))
  }

  pub fn as_primitive(&self) -> Option<&Primitive> {
    match self {
      Value::Primitive(p) => Some(p),
      _ => None,
    }
  }

  pub fn as_config(&self) -> Option<&Arc<ResolvedConfig>> {
    match self {
      Value::Config(c) => Some(c),
      _ => None,
    }
  }

  pub fn as_instance(&self) -> Option<&Instance> {
    match self {
      Value::Instance(i) => Some(i),
      _ => None,
    }
  }

  /// The instance as `Arc<T>`, if it was constructed as a `T`.
  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    match self {
      Value::Instance(i) => Arc::clone(i).downcast::<T>().ok(),
      _ => None,
    }
  }

  /// The instance as a shared trait object, if it was registered through
  /// [`Constructor::shared`](crate::Constructor::shared).
  pub fn downcast_shared<I: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<I>> {
    match self {
      Value::Instance(i) => i.downcast_ref::<Arc<I>>().cloned(),
      _ => None,
    }
  }

  /// Instances and configs compare by pointer, primitives by value.
  pub fn same_identity(&self, other: &Value) -> bool {
    match (self, other) {
      (Value::Instance(a), Value::Instance(b)) => {
        std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
      }
      (Value::Config(a), Value::Config(b)) => Arc::ptr_eq(a, b),
      (Value::Primitive(a), Value::Primitive(b)) => a == b,
      _ => false,
    }
  }

  /// Short description used in error messages.
  pub fn describe(&self) -> &'static str {
    match self {
      Value::Primitive(p) => p.type_name(),
      Value::Config(_) => "config",
      Value::Instance(_) => "instance",
    }
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
      Value::Config(c) => f.debug_tuple("Config").field(c).finish(),
      Value::Instance(_) => f.write_str("Instance(..)"),
    }
  }
}

impl From<Primitive> for Value {
  fn from(p: Primitive) -> Self {
    Value::Primitive(p)
  }
}

/// Resolved constructor arguments, in the order of the binding's
/// argument aliases.
#[derive(Debug, Clone, Default)]
pub struct Args {
  values: Vec<Value>,
}

impl Args {
  pub fn new(values: Vec<Value>) -> Self {
    Self { values }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Value> {
    self.values.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Value> {
    self.values.iter()
  }

  fn value(&self, index: usize) -> Result<&Value, ArgError> {
    self.values.get(index).ok_or(ArgError::Missing { index })
  }

  fn mismatch(index: usize, expected: &'static str, found: &Value) -> ArgError {
    ArgError::Mismatch {
      index,
      expected,
      found: found.describe(),
    }
  }

  pub fn instance<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ArgError> {
    let value = self.value(index)?;
    value
      .downcast::<T>()
      .ok_or_else(|| Self::mismatch(index, type_name::<T>(), value))
  }

  pub fn shared<I: ?Sized + Any + Send + Sync>(&self, index: usize) -> Result<Arc<I>, ArgError> {
    let value = self.value(index)?;
    value
      .downcast_shared::<I>()
      .ok_or_else(|| Self::mismatch(index, type_name::<I>(), value))
  }

  pub fn primitive(&self, index: usize) -> Result<&Primitive, ArgError> {
    let value = self.value(index)?;
    value
      .as_primitive()
      .ok_or_else(|| Self::mismatch(index, "primitive", value))
  }

  pub fn int(&self, index: usize) -> Result<i64, ArgError> {
    match self.value(index)? {
      Value::Primitive(Primitive::Int(i)) => Ok(*i),
      other => Err(Self::mismatch(index, "integer", other)),
    }
  }

  /// Integers are widened.
  pub fn float(&self, index: usize) -> Result<f64, ArgError> {
    match self.value(index)? {
      Value::Primitive(Primitive::Float(x)) => Ok(*x),
      Value::Primitive(Primitive::Int(i)) => Ok(*i as f64),
      other => Err(Self::mismatch(index, "float", other)),
    }
  }

  pub fn str(&self, index: usize) -> Result<&str, ArgError> {
    match self.value(index)? {
      Value::Primitive(Primitive::Str(s)) => Ok(s.as_str()),
      other => Err(Self::mismatch(index, "string", other)),
    }
  }

  pub fn bool(&self, index: usize) -> Result<bool, ArgError> {
    match self.value(index)? {
      Value::Primitive(Primitive::Bool(b)) => Ok(*b),
      other => Err(Self::mismatch(index, "bool", other)),
    }
  }

  pub fn config(&self, index: usize) -> Result<Arc<ResolvedConfig>, ArgError> {
    match self.value(index)? {
      Value::Config(c) => Ok(Arc::clone(c)),
      other => Err(Self::mismatch(index, "config", other)),
    }
  }
}

impl From<Vec<Value>> for Args {
  fn from(values: Vec<Value>) -> Self {
    Self::new(values)
  }
}

impl<'a> IntoIterator for &'a Args {
  type Item = &'a Value;
  type IntoIter = std::slice::Iter<'a, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.values.iter()
  }
}

/// A field of a [`ResolvedConfig`].
#[derive(Debug, Clone)]
pub enum ConfigValue {
  /// Copied from the registered object unchanged.
  Json(serde_json::Value),
  /// Replaced by the value of the alias named in an `@inject:` marker.
  Injected(Value),
}

/// A config object after marker injection. The registered object is left
/// untouched; every resolution produces a new `ResolvedConfig`.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
  fields: BTreeMap<String, ConfigValue>,
}

impl ResolvedConfig {
  pub(crate) fn from_fields(fields: BTreeMap<String, ConfigValue>) -> Self {
    Self { fields }
  }

  pub fn get(&self, key: &str) -> Option<&ConfigValue> {
    self.fields.get(key)
  }

  /// A field that was not injected.
  pub fn json(&self, key: &str) -> Option<&serde_json::Value> {
    match self.fields.get(key)? {
      ConfigValue::Json(v) => Some(v),
      ConfigValue::Injected(_) => None,
    }
  }

  pub fn str(&self, key: &str) -> Option<&str> {
    self.json(key)?.as_str()
  }

  pub fn injected(&self, key: &str) -> Option<&Value> {
    match self.fields.get(key)? {
      ConfigValue::Injected(v) => Some(v),
      ConfigValue::Json(_) => None,
    }
  }

  pub fn instance<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
    self.injected(key)?.downcast::<T>()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.fields.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}

//! Binding records and the dependency kinds they can carry.
//!
//! A [`Dependency`] is chosen explicitly at registration time. The resolver
//! never inspects runtime shape; it dispatches on the variant.

use crate::error::{BoxError, Error, Result};
use crate::value::{Args, Instance, Value};
use serde::{Deserialize, Serialize};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A plain configuration object, as registered.
pub type ConfigObject = serde_json::Map<String, serde_json::Value>;

type BuildFn = dyn Fn(&Args) -> std::result::Result<Instance, BoxError> + Send + Sync;
type MethodFn = dyn Fn(&Args) -> std::result::Result<Value, BoxError> + Send + Sync;

/// A number, string or boolean. Primitives are never constructed; they are
/// handed to constructors exactly as registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
}

impl Primitive {
  /// Converts a JSON scalar. Returns `None` for null, arrays and objects.
  pub fn from_json(value: &serde_json::Value) -> Option<Self> {
    match value {
      serde_json::Value::Bool(b) => Some(Primitive::Bool(*b)),
      serde_json::Value::Number(n) => match n.as_i64() {
        Some(i) => Some(Primitive::Int(i)),
        None => n.as_f64().map(Primitive::Float),
      },
      serde_json::Value::String(s) => Some(Primitive::Str(s.clone())),
      _ => None,
    }
  }

  pub fn type_name(&self) -> &'static str {
    match self {
      Primitive::Bool(_) => "bool",
      Primitive::Int(_) => "integer",
      Primitive::Float(_) => "float",
      Primitive::Str(_) => "string",
    }
  }
}

impl fmt::Display for Primitive {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Primitive::Bool(b) => write!(f, "{}", b),
      Primitive::Int(i) => write!(f, "{}", i),
      Primitive::Float(x) => write!(f, "{}", x),
      Primitive::Str(s) => f.write_str(s),
    }
  }
}

macro_rules! impl_primitive_from {
  ($variant:ident, $target:ty, $($source:ty),+ $(,)?) => {
    $(
      impl From<$source> for Primitive {
        fn from(value: $source) -> Self {
          Primitive::$variant(<$target>::from(value))
        }
      }

      impl From<$source> for Dependency {
        fn from(value: $source) -> Self {
          Dependency::Primitive(Primitive::from(value))
        }
      }
    )+
  };
}

impl_primitive_from!(Bool, bool, bool);
impl_primitive_from!(Int, i64, i8, i16, i32, i64, u8, u16, u32);
impl_primitive_from!(Float, f64, f32, f64);
impl_primitive_from!(Str, String, String, &str);

// Integers that may not fit in an `i64` convert fallibly.
macro_rules! impl_primitive_try_from {
  ($($source:ty),+ $(,)?) => {
    $(
      impl TryFrom<$source> for Primitive {
        type Error = std::num::TryFromIntError;

        fn try_from(value: $source) -> std::result::Result<Self, Self::Error> {
          i64::try_from(value).map(Primitive::Int)
        }
      }
    )+
  };
}

impl_primitive_try_from!(u64, usize, isize, i128, u128);

/// A constructible type: a closure that turns resolved arguments into an instance.
#[derive(Clone)]
pub struct Constructor {
  type_name: &'static str,
  build: Arc<BuildFn>,
}

impl Constructor {
  /// Wraps a constructor producing a concrete `T`. The instance is resolved
  /// as `Arc<T>`.
  pub fn new<T, F>(ctor: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Args) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
  {
    Self {
      type_name: type_name::<T>(),
      build: Arc::new(move |args: &Args| {
        let instance: Instance = Arc::new(ctor(args)?);
        Ok(instance)
      }),
    }
  }

  /// Wraps a constructor producing a shared trait object `Arc<I>`.
  pub fn shared<I, F>(ctor: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Args) -> std::result::Result<Arc<I>, BoxError> + Send + Sync + 'static,
  {
    Self {
      type_name: type_name::<I>(),
      build: Arc::new(move |args: &Args| {
        let instance: Instance = Arc::new(ctor(args)?);
        Ok(instance)
      }),
    }
  }

  /// Name of the type this constructor produces.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub(crate) fn construct(&self, args: &Args) -> std::result::Result<Instance, BoxError> {
    (self.build)(args)
  }
}

impl fmt::Debug for Constructor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Constructor({})", self.type_name)
  }
}

/// A target value together with the named factory methods it exposes.
///
/// Built with [`FactoryHolder::builder`], e.g.
/// `FactoryHolder::builder(pool).method("connect", |pool: &Pool, args: &Args| ...)`.
#[derive(Clone)]
pub struct FactoryHolder {
  target: Instance,
  target_type: &'static str,
  methods: HashMap<String, Arc<MethodFn>>,
}

impl FactoryHolder {
  /// Starts a holder around `target`. Methods are added on the returned builder.
  pub fn builder<T: Any + Send + Sync>(target: T) -> FactoryBuilder<T> {
    FactoryBuilder::from_arc(Arc::new(target))
  }

  pub fn has_method(&self, name: &str) -> bool {
    self.methods.contains_key(name)
  }

  /// Method names in sorted order.
  pub fn method_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  pub fn target_type(&self) -> &'static str {
    self.target_type
  }

  /// The target value, if it is a `T`.
  pub fn target<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    Arc::clone(&self.target).downcast::<T>().ok()
  }

  /// Invokes `method` with `args`. Returns `None` if no such method exists.
  pub(crate) fn invoke(
    &self,
    method: &str,
    args: &Args,
  ) -> Option<std::result::Result<Value, BoxError>> {
    self.methods.get(method).map(|call| call(args))
  }
}

impl fmt::Debug for FactoryHolder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FactoryHolder")
      .field("target_type", &self.target_type)
      .field("methods", &self.method_names())
      .finish()
  }
}

/// Typed builder for a [`FactoryHolder`].
pub struct FactoryBuilder<T> {
  target: Arc<T>,
  methods: HashMap<String, Arc<MethodFn>>,
}

impl<T: Any + Send + Sync> FactoryBuilder<T> {
  /// Starts a holder around an already shared target.
  pub fn from_arc(target: Arc<T>) -> Self {
    Self {
      target,
      methods: HashMap::new(),
    }
  }

  /// Adds a factory method whose product is resolved as `Arc<R>`.
  pub fn method<R, F>(self, name: impl Into<String>, method: F) -> Self
  where
    R: Any + Send + Sync,
    F: Fn(&T, &Args) -> std::result::Result<R, BoxError> + Send + Sync + 'static,
  {
    self.value_method(name, move |target: &T, args: &Args| {
      Ok(Value::instance(method(target, args)?))
    })
  }

  /// Adds a factory method that produces a [`Value`] directly, e.g. a primitive.
  pub fn value_method<F>(mut self, name: impl Into<String>, method: F) -> Self
  where
    F: Fn(&T, &Args) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
  {
    let target = Arc::clone(&self.target);
    self
      .methods
      .insert(name.into(), Arc::new(move |args: &Args| method(&*target, args)));
    self
  }

  pub fn build(self) -> FactoryHolder {
    FactoryHolder {
      target: self.target,
      target_type: type_name::<T>(),
      methods: self.methods,
    }
  }
}

impl<T: Any + Send + Sync> From<FactoryBuilder<T>> for FactoryHolder {
  fn from(builder: FactoryBuilder<T>) -> Self {
    builder.build()
  }
}

/// What a binding resolves to.
#[derive(Clone)]
pub enum Dependency {
  Primitive(Primitive),
  Config(ConfigObject),
  Constructible(Constructor),
  Factory(FactoryHolder),
}

impl Dependency {
  /// Shorthand for `Dependency::Constructible(Constructor::new(ctor))`.
  pub fn constructor<T, F>(ctor: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Args) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
  {
    Dependency::Constructible(Constructor::new(ctor))
  }

  /// Shorthand for `Dependency::Constructible(Constructor::shared(ctor))`.
  pub fn shared<I, F>(ctor: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Args) -> std::result::Result<Arc<I>, BoxError> + Send + Sync + 'static,
  {
    Dependency::Constructible(Constructor::shared(ctor))
  }

  /// Maps a JSON value onto a dependency: scalars become primitives and
  /// objects become config objects. On failure the JSON kind is returned.
  pub fn from_json(value: serde_json::Value) -> std::result::Result<Self, &'static str> {
    match value {
      serde_json::Value::Object(object) => Ok(Dependency::Config(object)),
      other => Primitive::from_json(&other)
        .map(Dependency::Primitive)
        .ok_or_else(|| json_kind(&other)),
    }
  }

  pub fn kind(&self) -> BindingKind {
    classify(self)
  }
}

impl fmt::Debug for Dependency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Dependency::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
      Dependency::Config(object) => f.debug_tuple("Config").field(object).finish(),
      Dependency::Constructible(ctor) => f.debug_tuple("Constructible").field(ctor).finish(),
      Dependency::Factory(holder) => f.debug_tuple("Factory").field(holder).finish(),
    }
  }
}

impl From<Primitive> for Dependency {
  fn from(value: Primitive) -> Self {
    Dependency::Primitive(value)
  }
}

impl From<ConfigObject> for Dependency {
  fn from(object: ConfigObject) -> Self {
    Dependency::Config(object)
  }
}

impl From<Constructor> for Dependency {
  fn from(ctor: Constructor) -> Self {
    Dependency::Constructible(ctor)
  }
}

impl From<FactoryHolder> for Dependency {
  fn from(holder: FactoryHolder) -> Self {
    Dependency::Factory(holder)
  }
}

impl<T: Any + Send + Sync> From<FactoryBuilder<T>> for Dependency {
  fn from(builder: FactoryBuilder<T>) -> Self {
    Dependency::Factory(builder.build())
  }
}

/// The category a dependency falls into for resolution purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
  Primitive,
  Config,
  Constructible,
  Factory,
}

impl BindingKind {
  pub fn as_str(self) -> &'static str {
    match self {
      BindingKind::Primitive => "primitive",
      BindingKind::Config => "config",
      BindingKind::Constructible => "constructible",
      BindingKind::Factory => "factory",
    }
  }
}

impl fmt::Display for BindingKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Classifies a dependency.
pub fn classify(dependency: &Dependency) -> BindingKind {
  match dependency {
    Dependency::Primitive(_) => BindingKind::Primitive,
    Dependency::Config(_) => BindingKind::Config,
    Dependency::Constructible(_) => BindingKind::Constructible,
    Dependency::Factory(_) => BindingKind::Factory,
  }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
  match value {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "a boolean",
    serde_json::Value::Number(_) => "a number",
    serde_json::Value::String(_) => "a string",
    serde_json::Value::Array(_) => "an array",
    serde_json::Value::Object(_) => "an object",
  }
}

/// A registration request.
///
/// Fields are public so a binding can be assembled literally; the builder
/// methods cover the common cases. Nothing is checked until the binding is
/// added to a container.
#[derive(Debug, Clone, Default)]
pub struct Binding {
  pub alias: String,
  pub dependency: Option<Dependency>,
  /// Aliases of the constructor arguments, in positional order.
  pub ctor_arg_aliases: Vec<String>,
  pub factory_method: Option<String>,
  pub singleton: bool,
}

impl Binding {
  pub fn new(alias: impl Into<String>, dependency: impl Into<Dependency>) -> Self {
    Self {
      alias: alias.into(),
      dependency: Some(dependency.into()),
      ..Default::default()
    }
  }

  pub fn with_args<I, S>(mut self, aliases: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.ctor_arg_aliases = aliases.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_factory_method(mut self, name: impl Into<String>) -> Self {
    self.factory_method = Some(name.into());
    self
  }

  pub fn as_singleton(mut self) -> Self {
    self.singleton = true;
    self
  }

  pub(crate) fn validate(self) -> Result<Registration> {
    if self.alias.is_empty() {
      return Err(Error::InvalidBinding("binding alias is null or empty".into()));
    }
    let Some(dependency) = self.dependency else {
      return Err(Error::InvalidBinding(format!(
        "binding dependency for '{}' is null or empty",
        self.alias
      )));
    };
    if self.ctor_arg_aliases.iter().any(String::is_empty) {
      return Err(Error::InvalidBinding(format!(
        "binding '{}' has an empty constructor argument alias",
        self.alias
      )));
    }

    match (&dependency, self.factory_method.as_deref()) {
      (Dependency::Factory(_), None) => {
        return Err(Error::InvalidBinding(format!(
          "factory binding '{}' needs a factory method",
          self.alias
        )));
      }
      (Dependency::Factory(holder), Some(method)) if !holder.has_method(method) => {
        return Err(Error::InvalidBinding(format!(
          "factory for '{}' ({}) has no method '{}'",
          self.alias,
          holder.target_type(),
          method
        )));
      }
      (Dependency::Factory(_), Some(_)) => {}
      (other, Some(method)) => {
        return Err(Error::InvalidBinding(format!(
          "factory method '{}' set on {} binding '{}'",
          method,
          other.kind(),
          self.alias
        )));
      }
      (Dependency::Primitive(_) | Dependency::Config(_), None)
        if !self.ctor_arg_aliases.is_empty() =>
      {
        return Err(Error::InvalidBinding(format!(
          "{} binding '{}' cannot take constructor arguments",
          dependency.kind(),
          self.alias
        )));
      }
      _ => {}
    }

    Ok(Registration {
      alias: self.alias,
      dependency,
      ctor_arg_aliases: self.ctor_arg_aliases,
      factory_method: self.factory_method,
      singleton: self.singleton,
    })
  }
}

/// A validated binding, as stored in the registry.
#[derive(Debug)]
pub struct Registration {
  alias: String,
  dependency: Dependency,
  ctor_arg_aliases: Vec<String>,
  factory_method: Option<String>,
  singleton: bool,
}

impl Registration {
  pub fn alias(&self) -> &str {
    &self.alias
  }

  pub fn dependency(&self) -> &Dependency {
    &self.dependency
  }

  pub fn ctor_arg_aliases(&self) -> &[String] {
    &self.ctor_arg_aliases
  }

  pub fn factory_method(&self) -> Option<&str> {
    self.factory_method.as_deref()
  }

  pub fn is_singleton(&self) -> bool {
    self.singleton
  }

  pub fn kind(&self) -> BindingKind {
    self.dependency.kind()
  }
}

//! The main `Container` struct and its registration and resolution helpers.

use crate::binding::{Binding, ConfigObject, Dependency, FactoryHolder, Primitive};
use crate::config::ContainerConfig;
use crate::core::Core;
use crate::error::{BoxError, Error, Result};
use crate::observer::ResolutionObserver;
use crate::value::{Args, Value};
use std::any::{type_name, Any};
use std::sync::Arc;

/// The Inversion of Control (IoC) container.
///
/// Services are registered under string aliases together with the aliases of
/// their constructor arguments, and resolved by alias. The container is
/// `Send + Sync`; concurrent callers share one registry and singleton cache.
#[derive(Debug, Default)]
pub struct Container {
  core: Core,
}

impl Container {
  /// Creates a new, empty `Container` that logs through `tracing`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Container` reporting events to `observer`.
  pub fn with_observer(observer: impl ResolutionObserver + 'static) -> Self {
    Self {
      core: Core::with_observer(Arc::new(observer)),
    }
  }

  /// The underlying registry and resolver.
  pub fn core(&self) -> &Core {
    &self.core
  }

  pub fn binding_count(&self) -> usize {
    self.core.binding_count()
  }

  pub fn singleton_count(&self) -> usize {
    self.core.singleton_count()
  }

  // --- PRIVATE HELPERS ---

  fn register_internal(
    &self,
    alias: &str,
    dependency: Dependency,
    factory_method: Option<&str>,
    ctor_arg_aliases: &[&str],
    singleton: bool,
  ) -> Result<()> {
    let mut binding = Binding::new(alias, dependency).with_args(ctor_arg_aliases.iter().copied());
    binding.factory_method = factory_method.map(str::to_owned);
    binding.singleton = singleton;
    self.core.add_binding(binding)
  }

  fn register_factory_internal(
    &self,
    alias: &str,
    holder: FactoryHolder,
    factory_method: &str,
    ctor_arg_aliases: &[&str],
    singleton: bool,
  ) -> Result<()> {
    if factory_method.is_empty() {
      return Err(Error::InvalidBinding("factory method must be specified".into()));
    }
    self.register_internal(
      alias,
      Dependency::Factory(holder),
      Some(factory_method),
      ctor_arg_aliases,
      singleton,
    )
  }

  // --- PUBLIC API ---

  /// Adds a fully specified binding.
  pub fn add_binding(&self, binding: Binding) -> Result<()> {
    self.core.add_binding(binding)
  }

  // --- Transient Registration ---
  pub fn register(
    &self,
    alias: &str,
    dependency: impl Into<Dependency>,
    ctor_arg_aliases: &[&str],
  ) -> Result<()> {
    self.register_internal(alias, dependency.into(), None, ctor_arg_aliases, false)
  }

  pub fn register_constructor<T, F>(&self, alias: &str, ctor_arg_aliases: &[&str], ctor: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn(&Args) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
  {
    self.register(alias, Dependency::constructor(ctor), ctor_arg_aliases)
  }

  // --- Singleton Registration ---
  pub fn register_singleton(
    &self,
    alias: &str,
    dependency: impl Into<Dependency>,
    ctor_arg_aliases: &[&str],
  ) -> Result<()> {
    self.register_internal(alias, dependency.into(), None, ctor_arg_aliases, true)
  }

  pub fn register_singleton_constructor<T, F>(
    &self,
    alias: &str,
    ctor_arg_aliases: &[&str],
    ctor: F,
  ) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn(&Args) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
  {
    self.register_singleton(alias, Dependency::constructor(ctor), ctor_arg_aliases)
  }

  // --- Factory Registration ---
  pub fn register_factory(
    &self,
    alias: &str,
    holder: impl Into<FactoryHolder>,
    factory_method: &str,
    ctor_arg_aliases: &[&str],
  ) -> Result<()> {
    self.register_factory_internal(alias, holder.into(), factory_method, ctor_arg_aliases, false)
  }

  pub fn register_singleton_factory(
    &self,
    alias: &str,
    holder: impl Into<FactoryHolder>,
    factory_method: &str,
    ctor_arg_aliases: &[&str],
  ) -> Result<()> {
    self.register_factory_internal(alias, holder.into(), factory_method, ctor_arg_aliases, true)
  }

  // --- Value Registration ---

  /// Registers a primitive. `u64`, `usize` and other wide integers go through
  /// `Primitive::try_from` first, since they may not fit in an `i64`.
  pub fn register_value(&self, alias: &str, value: impl Into<Primitive>) -> Result<()> {
    self.register(alias, Dependency::Primitive(value.into()), &[])
  }

  /// Registers a JSON value: objects become config bindings, scalars become
  /// primitives. Null and arrays are rejected.
  pub fn register_config(&self, alias: &str, value: serde_json::Value) -> Result<()> {
    let dependency = Dependency::from_json(value).map_err(|found| {
      Error::InvalidBinding(format!(
        "config for '{}' is {}; expected an object or a scalar",
        alias, found
      ))
    })?;
    self.register(alias, dependency, &[])
  }

  pub fn register_config_object(&self, alias: &str, object: ConfigObject) -> Result<()> {
    self.register(alias, Dependency::Config(object), &[])
  }

  /// Registers every value of `config`. Returns the number of bindings added.
  pub fn load_config(&self, config: &ContainerConfig) -> Result<usize> {
    let bindings = config.bindings()?;
    let count = bindings.len();
    for binding in bindings {
      self.core.add_binding(binding)?;
    }
    Ok(count)
  }

  // --- Resolution ---

  /// Resolves `alias` into a value.
  pub fn resolve(&self, alias: &str) -> Result<Value> {
    self.core.create_instance(alias)
  }

  /// Resolves `alias` and downcasts the instance to `T`.
  pub fn resolve_as<T: Any + Send + Sync>(&self, alias: &str) -> Result<Arc<T>> {
    let value = self.resolve(alias)?;
    value.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
      alias: alias.to_owned(),
      expected: type_name::<T>(),
      found: value.describe(),
    })
  }

  /// Resolves `alias` as a shared trait object registered with
  /// [`Dependency::shared`].
  pub fn resolve_shared<I: ?Sized + Any + Send + Sync>(&self, alias: &str) -> Result<Arc<I>> {
    let value = self.resolve(alias)?;
    value.downcast_shared::<I>().ok_or_else(|| Error::TypeMismatch {
      alias: alias.to_owned(),
      expected: type_name::<I>(),
      found: value.describe(),
    })
  }
}

/// Future-returning variants for callers that expect an asynchronous API.
/// They complete without suspending.
#[cfg(feature = "async")]
impl Container {
  pub async fn register_async(&self, binding: Binding) -> Result<()> {
    self.add_binding(binding)
  }

  pub async fn resolve_async(&self, alias: &str) -> Result<Value> {
    self.resolve(alias)
  }

  pub async fn resolve_as_async<T: Any + Send + Sync>(&self, alias: &str) -> Result<Arc<T>> {
    self.resolve_as::<T>(alias)
  }
}

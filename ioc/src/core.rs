//! The registration and resolution engine.
//!
//! [`Core`] owns an ordered list of bindings and a singleton cache. Lookup
//! returns the first binding registered under an alias, so a later binding
//! with the same alias is never reached.
//!
//! Each singleton alias owns a `OnceCell`. Concurrent first resolutions block
//! on the cell, so a singleton's constructor or factory runs exactly once.

use crate::binding::{Binding, Dependency, Registration};
use crate::error::{Error, Result};
use crate::inject::inject_config;
use crate::observer::{ResolutionObserver, TracingObserver};
use crate::value::{Args, Value};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_CORE_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
  // Aliases currently being resolved on this thread, tagged with the id of
  // the core resolving them. Re-entering an alias of the same core is a cycle.
  static RESOLVING_STACK: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

/// An RAII guard that detects circular dependencies.
///
/// Entering pushes the alias onto the thread-local resolution stack and fails
/// if the same core is already resolving it. Dropping the guard pops it.
pub(crate) struct ResolutionGuard {
  _private: (),
}

impl ResolutionGuard {
  pub(crate) fn enter(core_id: usize, alias: &str) -> Result<Self> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(start) = stack
        .iter()
        .position(|(id, resolving)| *id == core_id && resolving == alias)
      {
        let mut path: Vec<String> = stack[start..]
          .iter()
          .filter(|(id, _)| *id == core_id)
          .map(|(_, resolving)| resolving.clone())
          .collect();
        path.push(alias.to_owned());
        return Err(Error::CircularDependency { path });
      }
      stack.push((core_id, alias.to_owned()));
      Ok(Self { _private: () })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().pop();
    });
  }
}

/// The binding registry and resolver.
pub struct Core {
  id: usize,
  bindings: RwLock<Vec<Arc<Registration>>>,
  singletons: DashMap<String, Arc<OnceCell<Value>>>,
  observer: Arc<dyn ResolutionObserver>,
}

impl Default for Core {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Core {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Core")
      .field("id", &self.id)
      .field("bindings", &self.binding_count())
      .field("singletons", &self.singleton_count())
      .finish()
  }
}

impl Core {
  /// Creates an empty core that reports events through [`TracingObserver`].
  pub fn new() -> Self {
    Self::with_observer(Arc::new(TracingObserver))
  }

  pub fn with_observer(observer: Arc<dyn ResolutionObserver>) -> Self {
    Self {
      id: NEXT_CORE_ID.fetch_add(1, Ordering::Relaxed),
      bindings: RwLock::new(Vec::new()),
      singletons: DashMap::new(),
      observer,
    }
  }

  // --- Registry ---

  /// Validates `binding` and appends it to the registry.
  ///
  /// Duplicate aliases are accepted; only the first one is ever resolved.
  pub fn add_binding(&self, binding: Binding) -> Result<()> {
    let registration = binding.validate()?;
    self.observer.on_register(
      registration.alias(),
      registration.kind(),
      registration.is_singleton(),
    );
    self.bindings.write().push(Arc::new(registration));
    Ok(())
  }

  pub fn binding_count(&self) -> usize {
    self.bindings.read().len()
  }

  /// Number of singletons built so far.
  pub fn singleton_count(&self) -> usize {
    self
      .singletons
      .iter()
      .filter(|entry| entry.value().get().is_some())
      .count()
  }

  /// The first binding registered under `alias`.
  pub fn lookup(&self, alias: &str) -> Option<Arc<Registration>> {
    self
      .bindings
      .read()
      .iter()
      .find(|registration| registration.alias() == alias)
      .cloned()
  }

  pub fn contains(&self, alias: &str) -> bool {
    self
      .bindings
      .read()
      .iter()
      .any(|registration| registration.alias() == alias)
  }

  // --- Resolution ---

  /// Resolves `alias` into a value, constructing its argument graph
  /// depth-first.
  ///
  /// Singletons are served from the cache once built. Errors from nested
  /// resolutions are returned unchanged; nothing is cached when resolution
  /// fails.
  pub fn create_instance(&self, alias: &str) -> Result<Value> {
    if alias.is_empty() {
      return Err(Error::InvalidAlias);
    }

    self.observer.on_resolve_start(alias);
    let result = self.resolve_alias(alias);
    if let Err(error) = &result {
      self.observer.on_resolve_failed(alias, error);
    }
    result
  }

  fn resolve_alias(&self, alias: &str) -> Result<Value> {
    let registration = self
      .lookup(alias)
      .ok_or_else(|| Error::UnknownAlias(alias.to_owned()))?;

    let value = if registration.is_singleton() {
      let cell = self.singleton_cell(alias);
      if let Some(cached) = cell.get() {
        self.observer.on_singleton_hit(alias);
        return Ok(cached.clone());
      }
      // Guard first: re-entering a cell that is still initializing deadlocks.
      let _guard = ResolutionGuard::enter(self.id, alias)?;
      cell
        .get_or_try_init(|| self.instantiate(&registration))?
        .clone()
    } else {
      let _guard = ResolutionGuard::enter(self.id, alias)?;
      self.instantiate(&registration)?
    };

    self.observer.on_resolved(alias, registration.kind());
    Ok(value)
  }

  /// The cache cell for `alias`, created empty on first use. A failed
  /// construction leaves the cell empty.
  fn singleton_cell(&self, alias: &str) -> Arc<OnceCell<Value>> {
    if let Some(cell) = self.singletons.get(alias) {
      return Arc::clone(cell.value());
    }
    Arc::clone(self.singletons.entry(alias.to_owned()).or_default().value())
  }

  fn instantiate(&self, registration: &Registration) -> Result<Value> {
    match registration.dependency() {
      Dependency::Primitive(primitive) => Ok(Value::Primitive(primitive.clone())),
      Dependency::Config(object) => {
        let resolved = inject_config(object, |target| self.create_instance(target))?;
        Ok(Value::Config(Arc::new(resolved)))
      }
      Dependency::Constructible(ctor) => {
        let args = self.resolve_arguments(registration)?;
        ctor
          .construct(&args)
          .map(Value::Instance)
          .map_err(|source| Error::Construction {
            alias: registration.alias().to_owned(),
            source,
          })
      }
      Dependency::Factory(holder) => {
        let args = self.resolve_arguments(registration)?;
        let method = registration.factory_method().unwrap_or_default();
        match holder.invoke(method, &args) {
          Some(result) => result.map_err(|source| Error::Construction {
            alias: registration.alias().to_owned(),
            source,
          }),
          None => Err(Error::InvalidBinding(format!(
            "factory for '{}' has no method '{}'",
            registration.alias(),
            method
          ))),
        }
      }
    }
  }

  /// Resolves the constructor arguments of `registration`, left to right.
  ///
  /// Every argument goes through [`Core::create_instance`], so primitives are
  /// handed over as registered and still report observer events.
  fn resolve_arguments(&self, registration: &Registration) -> Result<Args> {
    let mut values = Vec::with_capacity(registration.ctor_arg_aliases().len());
    for alias in registration.ctor_arg_aliases() {
      values.push(self.create_instance(alias)?);
    }
    Ok(Args::new(values))
  }
}

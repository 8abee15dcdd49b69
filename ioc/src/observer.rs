//! Hooks invoked on registration and resolution events.

use crate::binding::BindingKind;
use crate::error::Error;

pub(crate) const LOG_TARGET: &str = "alias_ioc";

/// Receives registration and resolution events from a container.
///
/// All methods default to doing nothing, so an implementation only needs the
/// events it cares about. Nested resolutions report their own events.
pub trait ResolutionObserver: Send + Sync {
  fn on_register(&self, _alias: &str, _kind: BindingKind, _singleton: bool) {}

  fn on_resolve_start(&self, _alias: &str) {}

  /// A singleton was served from the cache.
  fn on_singleton_hit(&self, _alias: &str) {}

  fn on_resolved(&self, _alias: &str, _kind: BindingKind) {}

  fn on_resolve_failed(&self, _alias: &str, _error: &Error) {}
}

/// Emits `tracing` events. This is the default observer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
  fn on_register(&self, alias: &str, kind: BindingKind, singleton: bool) {
    tracing::debug!(target: LOG_TARGET, alias, kind = %kind, singleton, "binding registered");
  }

  fn on_resolve_start(&self, alias: &str) {
    tracing::trace!(target: LOG_TARGET, alias, "resolving");
  }

  fn on_singleton_hit(&self, alias: &str) {
    tracing::trace!(target: LOG_TARGET, alias, "singleton cache hit");
  }

  fn on_resolved(&self, alias: &str, kind: BindingKind) {
    tracing::debug!(target: LOG_TARGET, alias, kind = %kind, "resolved");
  }

  fn on_resolve_failed(&self, alias: &str, error: &Error) {
    tracing::warn!(target: LOG_TARGET, alias, error = %error, "resolution failed");
  }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {}

//! # Alias IoC
//!
//! An alias-keyed Inversion of Control (IoC) container for Rust.
//!
//! Services are registered under string aliases together with the aliases of
//! their constructor arguments. Resolving an alias walks the argument graph
//! depth-first, builds every dependency, and hands the results to the
//! constructor in order.
//!
//! ## Core Concepts
//!
//! - **Binding**: an alias, a [`Dependency`], the aliases of its constructor
//!   arguments, an optional factory method and a singleton flag.
//! - **Dependency kinds**: primitives (passed through untouched), config objects
//!   (with `@inject:` markers), constructors and factory holders.
//! - **Singletons**: the first resolved value is cached for the lifetime of the
//!   container. Everything else is transient.
//! - **Observability**: registration and resolution events go to a
//!   [`ResolutionObserver`]; the default one emits `tracing` events.
//!
//! ## Quick Start
//!
//! ```
//! use alias_ioc::{Args, Container};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Db {
//!     url: String,
//! }
//!
//! struct Repo {
//!     db: Arc<Db>,
//!     page_size: i64,
//! }
//!
//! let container = Container::new();
//! container
//!     .register_config("db_settings", json!({ "url": "postgres://localhost/app" }))
//!     .unwrap();
//! container
//!     .register_singleton_constructor("db", &["db_settings"], |args: &Args| {
//!         let settings = args.config(0)?;
//!         Ok(Db { url: settings.str("url").unwrap_or_default().to_string() })
//!     })
//!     .unwrap();
//! container.register_value("page_size", 50).unwrap();
//! container
//!     .register_constructor("repo", &["db", "page_size"], |args: &Args| {
//!         Ok(Repo { db: args.instance::<Db>(0)?, page_size: args.int(1)? })
//!     })
//!     .unwrap();
//!
//! let first = container.resolve_as::<Repo>("repo").unwrap();
//! let second = container.resolve_as::<Repo>("repo").unwrap();
//!
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first.db, &second.db));
//! assert_eq!(first.db.url, "postgres://localhost/app");
//! assert_eq!(first.page_size, 50);
//! ```

mod binding;
mod config;
mod container;
mod core;
mod error;
mod inject;
mod macros;
mod observer;
mod value;

pub use binding::{
  classify, Binding, BindingKind, ConfigObject, Constructor, Dependency, FactoryBuilder,
  FactoryHolder, Primitive, Registration,
};
pub use config::ContainerConfig;
pub use container::Container;
pub use crate::core::Core;
pub use error::{ArgError, BoxError, ConfigError, Error, Result};
pub use inject::{inject_ref, injected_alias, INJECT_MARKER};
pub use observer::{NoopObserver, ResolutionObserver, TracingObserver};
pub use value::{Args, ConfigValue, Instance, ResolvedConfig, Value};

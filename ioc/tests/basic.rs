use alias_ioc::{Args, Binding, Container, Dependency, Error, FactoryHolder, Primitive};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

struct Db;

struct Repo {
  db: Arc<Db>,
}

struct Server {
  port: i64,
}

// --- Registration ---

#[test]
fn test_empty_alias_is_rejected() {
  let container = Container::new();

  let result = container.register_constructor("", &[], |_| Ok(Db));

  assert!(matches!(result, Err(Error::InvalidBinding(_))));
  assert_eq!(container.binding_count(), 0);
}

#[test]
fn test_missing_dependency_is_rejected() {
  let container = Container::new();
  let binding = Binding {
    alias: "db".to_string(),
    dependency: None,
    ..Default::default()
  };

  assert!(matches!(
    container.add_binding(binding),
    Err(Error::InvalidBinding(_))
  ));
  assert_eq!(container.binding_count(), 0);
}

#[test]
fn test_factory_registration_requires_a_method_name() {
  struct Pool;
  let container = Container::new();
  let holder = FactoryHolder::builder(Pool).method("open", |_: &Pool, _: &Args| Ok(Db));

  let result = container.register_factory("conn", holder, "", &[]);

  match result {
    Err(Error::InvalidBinding(reason)) => assert_eq!(reason, "factory method must be specified"),
    other => panic!("unexpected result: {:?}", other),
  }
}

#[test]
fn test_binding_count_tracks_registrations() {
  let container = Container::new();
  container.register_value("port", 8080).unwrap();
  container.register_value("host", "localhost").unwrap();
  container.register_constructor("db", &[], |_| Ok(Db)).unwrap();

  assert_eq!(container.binding_count(), 3);
}

// --- Lifetimes ---

#[test]
fn test_transient_resolutions_are_distinct() {
  let container = Container::new();
  container.register_constructor("db", &[], |_| Ok(Db)).unwrap();

  let r1 = container.resolve_as::<Db>("db").unwrap();
  let r2 = container.resolve_as::<Db>("db").unwrap();

  // Ensure it's a transient by checking the pointers are different.
  assert!(!Arc::ptr_eq(&r1, &r2));
  assert_eq!(container.singleton_count(), 0);
}

#[test]
fn test_singleton_resolutions_are_identical() {
  let container = Container::new();
  container.register_singleton_constructor("db", &[], |_| Ok(Db)).unwrap();

  let r1 = container.resolve_as::<Db>("db").unwrap();
  let r2 = container.resolve_as::<Db>("db").unwrap();

  assert!(Arc::ptr_eq(&r1, &r2));
  assert_eq!(container.singleton_count(), 1);
}

// --- Factories ---

#[test]
fn test_factory_method_runs_once_per_resolution_and_never_constructs_the_target() {
  static TARGETS_BUILT: AtomicUsize = AtomicUsize::new(0);
  static FACTORY_CALLS: AtomicUsize = AtomicUsize::new(0);

  struct ConnectionFactory;
  impl ConnectionFactory {
    fn new() -> Self {
      TARGETS_BUILT.fetch_add(1, Ordering::SeqCst);
      ConnectionFactory
    }
  }
  struct Connection {
    host: String,
  }

  let container = Container::new();
  container.register_value("host", "db.internal").unwrap();
  let holder = FactoryHolder::builder(ConnectionFactory::new()).method(
    "connect",
    |_: &ConnectionFactory, args: &Args| {
      FACTORY_CALLS.fetch_add(1, Ordering::SeqCst);
      Ok(Connection {
        host: args.str(0)?.to_string(),
      })
    },
  );
  container
    .register_factory("connection", holder, "connect", &["host"])
    .unwrap();

  let c1 = container.resolve_as::<Connection>("connection").unwrap();
  let c2 = container.resolve_as::<Connection>("connection").unwrap();

  assert_eq!(c1.host, "db.internal");
  assert!(!Arc::ptr_eq(&c1, &c2));
  assert_eq!(FACTORY_CALLS.load(Ordering::SeqCst), 2);
  // Only the explicit construction at registration time.
  assert_eq!(TARGETS_BUILT.load(Ordering::SeqCst), 1);
}

#[test]
fn test_singleton_factory_runs_once() {
  static FACTORY_CALLS: AtomicUsize = AtomicUsize::new(0);
  struct Pool;

  let container = Container::new();
  let holder = FactoryHolder::builder(Pool).method("open", |_: &Pool, _: &Args| {
    FACTORY_CALLS.fetch_add(1, Ordering::SeqCst);
    Ok(Db)
  });
  container
    .register_singleton_factory("db", holder, "open", &[])
    .unwrap();

  let r1 = container.resolve_as::<Db>("db").unwrap();
  let r2 = container.resolve_as::<Db>("db").unwrap();

  assert!(Arc::ptr_eq(&r1, &r2));
  assert_eq!(FACTORY_CALLS.load(Ordering::SeqCst), 1);
}

// --- Argument kinds ---

#[test]
fn test_primitive_argument_is_passed_through() {
  let container = Container::new();
  container.register_value("port", 8080).unwrap();
  container
    .register_constructor("server", &["port"], |args: &Args| {
      assert_eq!(args.primitive(0)?, &Primitive::Int(8080));
      Ok(Server { port: args.int(0)? })
    })
    .unwrap();

  let server = container.resolve_as::<Server>("server").unwrap();

  assert_eq!(server.port, 8080);
}

#[test]
fn test_config_marker_is_replaced_by_the_resolved_instance() {
  let container = Container::new();
  container
    .register_singleton_constructor("dbConnectionAlias", &[], |_| Ok(Db))
    .unwrap();
  container
    .register_config(
      "settings",
      json!({ "db": "@inject:dbConnectionAlias", "name": "primary" }),
    )
    .unwrap();

  struct Service {
    db: Arc<Db>,
    name: String,
  }
  container
    .register_constructor("service", &["settings"], |args: &Args| {
      let settings = args.config(0)?;
      Ok(Service {
        db: settings.instance::<Db>("db").ok_or("db was not injected")?,
        name: settings.str("name").unwrap_or_default().to_string(),
      })
    })
    .unwrap();

  let service = container.resolve_as::<Service>("service").unwrap();
  let db = container.resolve_as::<Db>("dbConnectionAlias").unwrap();

  assert!(Arc::ptr_eq(&service.db, &db));
  assert_eq!(service.name, "primary");
}

#[test]
fn test_wide_integer_values_register_through_try_from() {
  let container = Container::new();
  let worker_count: usize = 16;
  container
    .register_value("workers", Primitive::try_from(worker_count).unwrap())
    .unwrap();

  let value = container.resolve("workers").unwrap();

  assert_eq!(value.as_primitive(), Some(&Primitive::Int(16)));
  assert!(Primitive::try_from(u64::MAX).is_err());
}

// --- Failures ---

#[test]
fn test_unknown_alias_fails_without_touching_the_cache() {
  let container = Container::new();
  container.register_singleton_constructor("db", &[], |_| Ok(Db)).unwrap();
  container.resolve("db").unwrap();
  let cached_before = container.singleton_count();

  let result = container.resolve("missing");

  assert!(matches!(result, Err(Error::UnknownAlias(alias)) if alias == "missing"));
  assert_eq!(container.singleton_count(), cached_before);
}

#[test]
fn test_empty_alias_resolution_fails() {
  let container = Container::new();
  assert!(matches!(container.resolve(""), Err(Error::InvalidAlias)));
}

// --- End to end ---

#[test]
fn test_transient_repo_shares_singleton_db() {
  let container = Container::new();
  container
    .add_binding(
      Binding::new(
        "repo",
        Dependency::constructor(|args| Ok(Repo { db: args.instance::<Db>(0)? })),
      )
      .with_args(["db"]),
    )
    .unwrap();
  container
    .add_binding(Binding::new("db", Dependency::constructor(|_| Ok(Db))).as_singleton())
    .unwrap();

  let repo1 = container.resolve_as::<Repo>("repo").unwrap();
  let repo2 = container.resolve_as::<Repo>("repo").unwrap();

  assert!(!Arc::ptr_eq(&repo1, &repo2));
  assert!(Arc::ptr_eq(&repo1.db, &repo2.db));
}

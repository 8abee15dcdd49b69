use alias_ioc::{inject_ref, Args, ConfigError, Container, ContainerConfig, Error, Primitive};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;

struct Logger {
  name: String,
}

struct Db {
  url: String,
  logger: Arc<Logger>,
}

const CONFIG: &str = r#"
version: 1
values:
  port: 5432
  debug: true
  ratio: 0.5
  db_settings:
    url: "postgres://localhost/app"
    logger: "@inject:logger"
singletons: [db_settings]
"#;

fn wired_container() -> Container {
  let container = Container::new();
  let config = ContainerConfig::from_yaml_str(CONFIG).unwrap();
  assert_eq!(container.load_config(&config).unwrap(), 4);

  container
    .register_singleton_constructor("logger", &[], |_| {
      Ok(Logger {
        name: "app".to_string(),
      })
    })
    .unwrap();
  container
    .register_constructor("db", &["db_settings"], |args: &Args| {
      let settings = args.config(0)?;
      Ok(Db {
        url: settings.str("url").ok_or("url missing")?.to_string(),
        logger: settings.instance::<Logger>("logger").ok_or("logger missing")?,
      })
    })
    .unwrap();
  container
}

#[test]
fn test_loaded_values_are_bound_by_kind() {
  let container = wired_container();

  assert_eq!(container.binding_count(), 6);
  assert_eq!(
    container.resolve("port").unwrap().as_primitive(),
    Some(&Primitive::Int(5432))
  );
  assert_eq!(
    container.resolve("debug").unwrap().as_primitive(),
    Some(&Primitive::Bool(true))
  );
  assert_eq!(
    container.resolve("ratio").unwrap().as_primitive(),
    Some(&Primitive::Float(0.5))
  );
}

#[test]
fn test_loaded_config_injects_code_registered_services() {
  let container = wired_container();

  let db1 = container.resolve_as::<Db>("db").unwrap();
  let db2 = container.resolve_as::<Db>("db").unwrap();

  assert_eq!(db1.url, "postgres://localhost/app");
  assert_eq!(db1.logger.name, "app");
  // db is transient, but its settings are a singleton.
  assert!(!Arc::ptr_eq(&db1, &db2));
  assert!(Arc::ptr_eq(&db1.logger, &db2.logger));
  let settings1 = container.resolve("db_settings").unwrap();
  let settings2 = container.resolve("db_settings").unwrap();
  assert!(settings1.same_identity(&settings2));
}

#[test]
fn test_config_from_file() {
  let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
  write!(
    file,
    r#"{{"values": {{"cache": {{"backend": "{}"}}}}, "singletons": ["cache"]}}"#,
    inject_ref("redis")
  )
  .unwrap();

  struct Redis;
  let container = Container::new();
  container
    .register_singleton_constructor("redis", &[], |_| Ok(Redis))
    .unwrap();
  let config = ContainerConfig::from_path(file.path()).unwrap();
  container.load_config(&config).unwrap();

  let cache = container.resolve("cache").unwrap();
  let redis = container.resolve_as::<Redis>("redis").unwrap();

  let injected = cache.as_config().unwrap().instance::<Redis>("backend").unwrap();
  assert!(Arc::ptr_eq(&injected, &redis));
}

#[test]
fn test_invalid_config_registers_nothing() {
  let container = Container::new();
  let config = ContainerConfig::from_yaml_str("values:\n  port: 80\nsingletons: [host]\n").unwrap();

  let error = container.load_config(&config).unwrap_err();

  assert!(matches!(
    error,
    Error::Config(ConfigError::UnknownSingleton(ref alias)) if alias == "host"
  ));
  assert_eq!(error.to_string(), "singleton 'host' has no configured value");
  assert_eq!(container.binding_count(), 0);
}

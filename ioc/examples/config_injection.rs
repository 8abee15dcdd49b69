//! Loads values from YAML, injects a code-registered service into a config
//! object and prints the container's tracing output.
//!
//! Run with `RUST_LOG=alias_ioc=trace cargo run --example config_injection`.

use alias_ioc::{Args, Container, ContainerConfig};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
values:
  pool_size: 8
  db_settings:
    url: "postgres://localhost/app"
    audit: "@inject:audit_log"
singletons: [db_settings]
"#;

struct AuditLog;

impl AuditLog {
  fn record(&self, event: &str) {
    println!("[AUDIT] {}", event);
  }
}

struct Database {
  url: String,
  pool_size: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("alias_ioc=debug")))
    .init();

  let container = Container::new();
  let loaded = container.load_config(&ContainerConfig::from_yaml_str(CONFIG)?)?;
  println!("Loaded {} bindings from YAML.", loaded);

  container.register_singleton_constructor("audit_log", &[], |_| Ok(AuditLog))?;
  container.register_singleton_constructor(
    "database",
    &["db_settings", "pool_size"],
    |args: &Args| {
      let settings = args.config(0)?;
      let audit = settings
        .instance::<AuditLog>("audit")
        .ok_or("db_settings.audit was not injected")?;
      audit.record("opening database");
      Ok(Database {
        url: settings.str("url").ok_or("db_settings.url is missing")?.to_string(),
        pool_size: args.int(1)?,
      })
    },
  )?;

  let db = container.resolve_as::<Database>("database")?;
  println!("Connected to {} with {} connections.", db.url, db.pool_size);
  Ok(())
}

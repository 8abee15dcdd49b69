use alias_ioc::{resolve_from, Args, Container, Dependency};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger {
  prefix: String,
}
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[{}]: {}", self.prefix, message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  let container = Container::new();

  // --- Registration ---

  container.register_value("log_prefix", "CONSOLE LOG").unwrap();

  // The constructor hands back an `Arc<dyn Logger>`, so dependents receive the
  // trait object rather than the concrete type.
  container
    .register_singleton(
      "logger",
      Dependency::shared::<dyn Logger, _>(|args| {
        let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger {
          prefix: args.str(0)?.to_string(),
        });
        Ok(logger)
      }),
      &["log_prefix"],
    )
    .unwrap();

  // ReportService names its dependency by alias; the container builds it.
  container
    .register_singleton_constructor("reports", &["logger"], |args: &Args| {
      Ok(ReportService {
        logger: args.shared::<dyn Logger>(0)?,
      })
    })
    .unwrap();

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve_from!(&container, ReportService, "reports");

  println!("Using the service...");
  report_service.generate_report();

  let logger = resolve_from!(&container, trait Logger, "logger");
  assert!(Arc::ptr_eq(&logger, &report_service.logger));
}

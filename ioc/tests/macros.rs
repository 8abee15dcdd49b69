// ioc/tests/macros.rs

//! Tests for the resolution macros:
//! - `maybe_resolve_from!`
//! - `resolve_from!`

use alias_ioc::{maybe_resolve_from, resolve_from, Args, Container, Dependency};
use std::sync::Arc;

// --- Test Fixtures ---

struct MacroTestService {
  value: i64,
}
trait MacroTestTrait: Send + Sync {
  fn value(&self) -> i64;
}
impl MacroTestTrait for MacroTestService {
  fn value(&self) -> i64 {
    self.value
  }
}
struct UnregisteredService;

fn container() -> Container {
  let container = Container::new();
  container.register_value("base", 100).unwrap();
  container
    .register_singleton_constructor("service", &["base"], |args: &Args| {
      Ok(MacroTestService { value: args.int(0)? })
    })
    .unwrap();
  container
    .register_singleton(
      "service_trait",
      Dependency::shared::<dyn MacroTestTrait, _>(|args| {
        let service: Arc<dyn MacroTestTrait> = Arc::new(MacroTestService {
          value: args.int(0)? + 2,
        });
        Ok(service)
      }),
      &["base"],
    )
    .unwrap();
  container
}

#[test]
fn test_maybe_resolve_from() {
  let container = container();

  assert_eq!(
    maybe_resolve_from!(&container, MacroTestService, "service")
      .unwrap()
      .value,
    100
  );
  assert_eq!(
    maybe_resolve_from!(&container, trait MacroTestTrait, "service_trait")
      .unwrap()
      .value(),
    102
  );

  // Unknown aliases and wrong types both come back as `None`.
  assert!(maybe_resolve_from!(&container, MacroTestService, "missing").is_none());
  assert!(maybe_resolve_from!(&container, UnregisteredService, "service").is_none());
  assert!(maybe_resolve_from!(&container, trait MacroTestTrait, "service").is_none());
}

#[test]
fn test_resolve_from() {
  let container = container();

  let first = resolve_from!(&container, MacroTestService, "service");
  let second = resolve_from!(&container, MacroTestService, "service");
  assert_eq!(first.value, 100);
  assert!(Arc::ptr_eq(&first, &second));

  assert_eq!(
    resolve_from!(&container, trait MacroTestTrait, "service_trait").value(),
    102
  );
}

#[test]
#[should_panic(expected = "Failed to resolve required service 'missing'")]
fn test_resolve_from_panics_on_missing_alias() {
  let container = container();
  resolve_from!(&container, MacroTestService, "missing");
}

#[test]
#[should_panic(expected = "Failed to resolve required trait service 'service'")]
fn test_resolve_from_panics_on_wrong_trait() {
  let container = container();
  // "service" holds a concrete `MacroTestService`, not a shared trait object.
  resolve_from!(&container, trait MacroTestTrait, "service");
}

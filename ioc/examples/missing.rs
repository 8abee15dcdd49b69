use alias_ioc::{resolve_from, Container, Error};
use std::panic::{self, AssertUnwindSafe};

struct UnregisteredService;

fn main() {
  let container = Container::new();

  // --- Using the panicking `resolve_from!` macro ---
  println!("Attempting to resolve an alias that was never registered...");

  let result = panic::catch_unwind(AssertUnwindSafe(|| {
    // This line will panic!
    let _service = resolve_from!(&container, UnregisteredService, "unregistered");
  }));

  assert!(result.is_err(), "resolve_from! should have panicked.");
  println!("Successfully caught the expected panic from resolve_from!.");

  // --- Using the fallible `resolve` method ---
  println!("\nNow, attempting to resolve using the fallible `resolve()` method...");

  match container.resolve("unregistered") {
    Ok(_) => panic!("Should not have found the service!"),
    Err(Error::UnknownAlias(alias)) => println!("Correctly received UnknownAlias('{}').", alias),
    Err(other) => panic!("Unexpected error: {}", other),
  }
}

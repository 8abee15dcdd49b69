//! Public macros for ergonomic service resolution.

/// Resolves a service from a container, panicking if it cannot be resolved.
///
/// # Panics
///
/// Panics if the alias is unknown, resolution fails, or the resolved value is
/// not of the requested type. For a non-panicking version, use
/// [`maybe_resolve_from!`] or `Container::resolve_as`.
///
/// # Examples
///
/// ```
/// use alias_ioc::{resolve_from, Container};
///
/// struct Clock;
///
/// let container = Container::new();
/// container.register_constructor("clock", &[], |_| Ok(Clock)).unwrap();
///
/// let _clock = resolve_from!(&container, Clock, "clock");
/// ```
#[macro_export]
macro_rules! resolve_from {
    // Arm for resolving a shared trait object: resolve_from!(&c, trait MyTrait, "alias")
    ($container:expr, trait $trait_ident:ident, $alias:expr) => {
        match $container.resolve_shared::<dyn $trait_ident>($alias) {
            Ok(service) => service,
            Err(error) => panic!(
                "Failed to resolve required trait service '{}': {}: {}",
                $alias,
                std::any::type_name::<dyn $trait_ident>(),
                error
            ),
        }
    };

    // Arm for resolving a concrete type: resolve_from!(&c, MyService, "alias")
    ($container:expr, $type:ty, $alias:expr) => {
        match $container.resolve_as::<$type>($alias) {
            Ok(service) => service,
            Err(error) => panic!(
                "Failed to resolve required service '{}': {}: {}",
                $alias,
                std::any::type_name::<$type>(),
                error
            ),
        }
    };
}

/// Resolves a service from a container, returning `None` on any failure.
#[macro_export]
macro_rules! maybe_resolve_from {
    ($container:expr, trait $trait_ident:ident, $alias:expr) => {
        $container.resolve_shared::<dyn $trait_ident>($alias).ok()
    };

    ($container:expr, $type:ty, $alias:expr) => {
        $container.resolve_as::<$type>($alias).ok()
    };
}

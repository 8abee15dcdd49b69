use thiserror::Error;

/// The error type returned by user constructors and factory methods.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for `alias_ioc`.
#[derive(Debug, Error)]
pub enum Error {
  /// The binding was rejected at registration time.
  #[error("invalid binding: {0}")]
  InvalidBinding(String),

  /// An empty alias was passed to a resolution call.
  #[error("binding alias is null or empty")]
  InvalidAlias,

  #[error("no binding registered for alias '{0}'")]
  UnknownAlias(String),

  /// A constructor or factory method returned an error. The original error
  /// is kept as the `source`.
  #[error("failed to construct '{alias}': {source}")]
  Construction {
    alias: String,
    #[source]
    source: BoxError,
  },

  /// The alias chain that led back to an alias already being resolved.
  #[error("circular dependency detected: {}", path.join(" -> "))]
  CircularDependency { path: Vec<String> },

  #[error("alias '{alias}' resolved to {found}, expected {expected}")]
  TypeMismatch {
    alias: String,
    expected: &'static str,
    found: &'static str,
  },

  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// A specialized `Result` type for `alias_ioc` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the typed accessors of [`Args`](crate::Args).
///
/// These convert into [`BoxError`] with `?`, so a constructor can use the
/// accessors directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
  #[error("missing constructor argument at position {index}")]
  Missing { index: usize },

  #[error("constructor argument {index} is {found}, expected {expected}")]
  Mismatch {
    index: usize,
    expected: &'static str,
    found: &'static str,
  },
}

/// Errors raised while reading a [`ContainerConfig`](crate::ContainerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read configuration file: {0}")]
  Read(#[from] std::io::Error),

  #[error("failed to parse configuration: {0}")]
  Parse(String),

  #[error("unsupported configuration version: {0}")]
  UnsupportedVersion(u32),

  #[error("value for alias '{alias}' is {found}; only scalars and objects can be bound")]
  UnsupportedValue { alias: String, found: &'static str },

  #[error("singleton '{0}' has no configured value")]
  UnknownSingleton(String),
}

/// Honeybadger notifier configuration
///
/// Holds every option the notifier's delivery pipeline reads: where the
/// collector lives (`host`, `port`, `protocol`, `proxy_*`), how long to wait
/// on it, and which errors, parameters, backtrace lines and user agents to
/// filter before a report goes out.
///
/// Options come from defaults, a JSON config file, `HONEYBADGER_*`
/// environment variables and direct mutation, in that order.
///
/// ```
/// let config = hb_notifier::configure(|config| {
///     config.api_key = Some("abc123".to_string());
///     config.ignore_only(["NotFound", "Unauthorized"]);
/// });
/// assert_eq!(config.protocol(), "https");
/// assert!(config.is_ignored_error("NotFound"));
/// ```

// Module declarations
pub mod config;
pub mod error;
pub mod filters;
pub mod global;
pub mod logger;

pub use config::{Configuration, OptionMap, OptionName, Value};
pub use error::ConfigError;
pub use filters::{AsyncHandler, BacktraceFilter, IgnoreFilter, Notice, OneOrMany, Predicate, Rule};
pub use global::{configuration, configure, reset_configuration, set_configuration};
pub use logger::Logger;

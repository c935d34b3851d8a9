/// Configuration module - Notifier options, defaults and loaders
pub mod defaults;
pub mod loader;
pub mod mapping;
pub mod schema;

pub use loader::{ConfigFile, apply_env, apply_env_from, load_adjacent_config, load_config};
pub use mapping::{OptionMap, OptionName, Value};
pub use schema::Configuration;

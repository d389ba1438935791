//! Configuration for termappchooser.
//!
//! The service runs without any configuration file; every section has a
//! default. A `config.jsonc` (or `config.json`) file can tune notifications,
//! the chooser policy and how terminal applications are launched.

mod schema;
mod types;

pub use schema::{generate_schema, generate_schema_json};
pub use types::{
    ChooserConfig, ChooserPolicyKind, ConfigError, LaunchConfig, NotificationsConfig,
    PortalConfig, config_paths, load, load_config, load_config_from_path, load_or_default,
};

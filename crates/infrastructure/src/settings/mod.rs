//! Harness configuration loading.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `PROBE_*` environment variables.

mod loader;

pub use loader::{CONFIG_PATH_VAR, ConfigError, ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};

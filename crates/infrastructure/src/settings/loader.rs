//! Layered configuration loader built on the `config` crate.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat, Map};
use probe_domain::{DomainError, HarnessConfig};
use thiserror::Error;
use tracing::debug;

/// File read when no path is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "probe.toml";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "PROBE_CONFIG";

/// Prefix of environment variables overriding single settings.
pub const ENV_PREFIX: &str = "PROBE";

/// Settings whose environment value is a comma-separated list.
///
/// Items are trimmed and empty items dropped.
const LIST_KEYS: [&str; 2] = ["tracked_headers", "ignore_patterns"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged configuration is invalid.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] DomainError),

    /// An ignore pattern does not compile.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Compilation error.
        source: regex::Error,
    },
}

/// Loads a [`HarnessConfig`] from defaults, a file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads this file (required) instead of `PROBE_CONFIG` / `probe.toml`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Uses these variables instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, vars: Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    fn env_var(&self, name: &str) -> Option<String> {
        match &self.env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    fn file_source(&self) -> File<config::FileSourceFile, FileFormat> {
        if let Some(path) = &self.file {
            return File::from(path.as_path()).required(true);
        }
        if let Some(path) = self.env_var(CONFIG_PATH_VAR).filter(|p| !p.is_empty()) {
            return File::from(Path::new(&path)).required(true);
        }
        File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a value has the wrong
    /// type, an ignore pattern does not compile, or the merged configuration
    /// fails validation.
    pub fn load(&self) -> Result<HarnessConfig, ConfigError> {
        let mut environment = Environment::with_prefix(ENV_PREFIX);
        if let Some(vars) = &self.env {
            environment = environment.source(Some(vars.clone()));
        }

        let mut builder = Config::builder()
            .add_source(self.file_source())
            .add_source(environment);
        // Values stay strings so tokens like `0123` survive; lists are split here.
        for key in LIST_KEYS {
            if let Some(raw) = self.env_var(&format!("{ENV_PREFIX}_{}", key.to_ascii_uppercase())) {
                builder = builder.set_override(key, split_list(&raw))?;
            }
        }
        let settings = builder.build()?;

        let config: HarnessConfig = settings.try_deserialize()?;
        config.validate()?;
        for pattern in &config.ignore_patterns {
            regex::Regex::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        debug!(
            base_url = %config.base_url,
            fixture_dir = %config.fixture_dir.display(),
            record_mode = %config.record_mode,
            "configuration loaded"
        );
        Ok(config)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

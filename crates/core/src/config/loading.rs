//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

type Builder = LibConfigBuilder<config::builder::DefaultState>;

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: Builder,
    key: &str,
    value: T,
) -> Result<Builder> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

fn builder_with_defaults() -> Result<Builder> {
    let builder = ConfigLib::builder();
    let builder = set_config_default(builder, "backend.base_url", default_base_url())?;
    let builder = set_config_default(
        builder,
        "backend.timeout_secs",
        default_timeout_secs() as i64,
    )?;
    let builder = set_config_default(builder, "search.debounce_ms", default_debounce_ms() as i64)?;
    set_config_default(builder, "agent.name", default_agent_name())
}

fn finish(builder: Builder) -> Result<Config> {
    // Environment variables with WFO_SEARCH_ prefix, `__` between nested keys
    let builder = builder.add_source(
        Environment::with_prefix("WFO_SEARCH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

    config
        .try_deserialize()
        .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// A missing file is not an error. Environment variables are prefixed with
    /// `WFO_SEARCH_` and use double underscores for nested values, for example
    /// `WFO_SEARCH_BACKEND__BASE_URL=http://search:8081`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = builder_with_defaults()?;
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }
        finish(builder)
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from every layer
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Global config file (~/.wfo-search/config.toml), if present
    /// 3. Explicit config file (--config), which must exist
    /// 4. Environment variables (WFO_SEARCH_*)
    ///
    /// Returns the config together with the files that contributed to it.
    pub fn load_layered(explicit: Option<&Path>) -> Result<(Self, Vec<PathBuf>)> {
        let mut builder = builder_with_defaults()?;
        let mut sources = Vec::new();

        match global_config_path() {
            Ok(global) if global.exists() => {
                builder = builder.add_source(File::from(global.as_path()));
                sources.push(global);
            }
            Ok(_) => {}
            Err(e) => debug!("Skipping global config: {e}"),
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
            sources.push(path.to_path_buf());
        }

        let config = finish(builder)?;
        debug!("Loaded config from {} file(s)", sources.len());
        Ok((config, sources))
    }
}

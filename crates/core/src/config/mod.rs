//! Configuration module for wfo-search
//!
//! This module provides configuration structures and loading mechanisms for
//! the search client. Configuration can be loaded from TOML files and/or
//! environment variables.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::entities::EntityKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.wfo-search/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory"))?;
    Ok(home_dir.join(".wfo-search").join("config.toml"))
}

/// Search backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the search service; endpoints live under `/api/search/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Interactive search behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a changed query is sent (default: 300ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Entity kind selected when a session starts
    #[serde(default)]
    pub default_entity_kind: EntityKind,
}

impl SearchConfig {
    pub fn debounce_duration(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Agent bridge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Name the search agent is registered under
    #[serde(default = "default_agent_name")]
    pub name: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub agent: AgentConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_entity_kind: EntityKind::default(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
        }
    }
}

impl Config {
    /// Check values the loaders cannot enforce
    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(Error::config("backend.base_url must not be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::config(format!(
                "Invalid backend.base_url '{url}': must start with http:// or https://"
            )));
        }

        if self.backend.timeout_secs == 0 {
            return Err(Error::config("backend.timeout_secs must be greater than 0"));
        }

        if self.search.debounce_ms == 0 || self.search.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(Error::config(format!(
                "search.debounce_ms must be between 1 and {MAX_DEBOUNCE_MS} (got {})",
                self.search.debounce_ms
            )));
        }

        if self.agent.name.trim().is_empty() {
            return Err(Error::config("agent.name must not be empty"));
        }

        Ok(())
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))
    }
}

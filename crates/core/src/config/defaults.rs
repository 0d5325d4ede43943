//! Default values and functions for configuration

use crate::agent_state::DEFAULT_AGENT_NAME;

// Default constants
pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081";
pub(crate) const MAX_DEBOUNCE_MS: u64 = 10_000;

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_debounce_ms() -> u64 {
    300
}

pub(crate) fn default_agent_name() -> String {
    DEFAULT_AGENT_NAME.to_string()
}

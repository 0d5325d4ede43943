//! HTTP client for the entity search service
//!
//! This crate provides the [`SearchBackend`] implementation that posts
//! [`wfo_search_core::SearchParameters`] to `/api/search/{kind}` and decodes
//! the returned result page.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use std::sync::Arc;
use tracing::info;
use wfo_search_core::config::BackendConfig;
use wfo_search_core::error::{Error, Result};
use wfo_search_core::SearchBackend;

pub mod error;
mod http;

pub use error::ClientError;
pub use http::HttpSearchBackend;

/// Create a search backend from configuration
///
/// # Arguments
/// * `config` - Backend configuration with base URL and timeout
pub fn create_search_backend(config: &BackendConfig) -> Result<Arc<dyn SearchBackend>> {
    if config.base_url.trim().is_empty() {
        return Err(Error::config(
            "Search backend URL required. Set backend.base_url or WFO_SEARCH_BACKEND__BASE_URL",
        ));
    }

    info!("Creating HTTP search backend");
    let backend = HttpSearchBackend::new(&config.base_url, config.timeout_secs)?;
    Ok(Arc::new(backend))
}

//! Library interface for the wfo-search CLI
//!
//! Rendering lives here so it can be tested without running the binary.

pub mod render;

pub use anyhow::Result;
pub use wfo_search_core::config::Config;

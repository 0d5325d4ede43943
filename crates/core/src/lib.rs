//! Core types and traits for wfo-search
//!
//! This crate provides the foundational abstractions used throughout the
//! search client, including:
//!
//! - **Entities**: the searchable entity kinds and their endpoints
//! - **Filters**: path filters and the canonical search parameters
//! - **Query translation**: search-bar input to backend parameters
//! - **Results**: structural classification of result records
//! - **Agent state**: the state shared with the conversational search agent
//! - **Configuration**: system configuration management
//! - **Error handling**: unified error types
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod agent_state;
pub mod config;
pub mod entities;
pub mod error;
pub mod filter;
pub mod query;
pub mod results;
pub mod search_api;
pub mod search_models;

// Re-export main types for convenience
pub use agent_state::{
    AgentParameters, AgentStateCell, SearchAgentState, SearchPhase, SessionMetadata, Versioned,
};
pub use config::{AgentConfig, BackendConfig, Config, SearchConfig};
pub use entities::EntityKind;
pub use error::{Error, Result};
pub use filter::{FilterCondition, PathFilter, ValueRange};
pub use query::{translate, Clause, ClauseKind, QueryAst, QueryInput, StructuredQuery};
pub use results::{
    ProcessResult, ProductResult, SearchResult, SubscriptionResult, WorkflowResult,
};
pub use search_api::SearchBackend;
#[cfg(any(test, feature = "mock"))]
pub use search_api::MockSearchBackend;
pub use search_models::{SearchAction, SearchParameters, SearchResponse};

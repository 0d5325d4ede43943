//! Search backend trait definition
//!
//! This trait defines the interface to the entity search service.
//! The HTTP implementation lives in the client crate.

use crate::entities::EntityKind;
use crate::error::Result;
use crate::results::SearchResult;
use crate::search_models::SearchParameters;
use async_trait::async_trait;

/// Trait defining search backend operations
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search against the endpoint for `kind` and return its result page
    async fn search(
        &self,
        kind: EntityKind,
        parameters: &SearchParameters,
    ) -> Result<Vec<SearchResult>>;
}

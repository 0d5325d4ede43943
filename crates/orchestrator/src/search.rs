//! One-shot search execution
//!
//! Translation, the activity gate and failure containment for a single
//! search. The interactive session and the command line both go through here.

use tracing::{debug, error};
use wfo_search_core::{translate, EntityKind, QueryInput, SearchBackend, SearchParameters, SearchResult};

/// What a single search produced
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The parameters were not active; no request was made
    Inactive,
    Completed(Vec<SearchResult>),
    /// The request failed; carries a human-readable message
    Failed(String),
}

impl SearchOutcome {
    /// Results to show; empty unless the search completed
    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchOutcome::Completed(results) => results,
            _ => &[],
        }
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            SearchOutcome::Completed(results) => results,
            _ => Vec::new(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Translate a query for `kind` and run it
pub async fn run_search(
    backend: &dyn SearchBackend,
    kind: EntityKind,
    query: &QueryInput,
) -> SearchOutcome {
    let parameters = translate(query, kind);
    execute(backend, &parameters).await
}

/// Run already translated parameters against the endpoint of their entity type
///
/// Inactive parameters short-circuit without touching the backend. Backend
/// failures are logged and reported as [`SearchOutcome::Failed`].
pub async fn execute(backend: &dyn SearchBackend, parameters: &SearchParameters) -> SearchOutcome {
    if !parameters.is_active() {
        debug!("Search inactive for {}, skipping request", parameters.entity_type);
        return SearchOutcome::Inactive;
    }

    match backend.search(parameters.entity_type, parameters).await {
        Ok(results) => {
            debug!(
                "Search for {} returned {} results",
                parameters.entity_type,
                results.len()
            );
            SearchOutcome::Completed(results)
        }
        Err(e) => {
            error!("Search error: {e}");
            SearchOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wfo_search_core::{Error, MockSearchBackend};

    #[tokio::test]
    async fn test_inactive_query_makes_no_request() {
        let mut backend = MockSearchBackend::new();
        backend.expect_search().times(0);

        for query in [
            QueryInput::MatchAll,
            QueryInput::Text(String::new()),
            QueryInput::Text("a".to_string()),
            QueryInput::Text("  b  ".to_string()),
        ] {
            let outcome = run_search(&backend, EntityKind::Subscription, &query).await;
            assert_eq!(outcome, SearchOutcome::Inactive);
            assert!(outcome.results().is_empty());
        }
    }

    #[tokio::test]
    async fn test_two_characters_search() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .withf(|kind, params| {
                *kind == EntityKind::Workflow && params.query.as_deref() == Some("ab")
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![SearchResult::classify(
                    json!({"name": "create_port", "products": []}),
                )])
            });

        let outcome = run_search(
            &backend,
            EntityKind::Workflow,
            &QueryInput::Text("ab".to_string()),
        )
        .await;

        assert_eq!(outcome.results().len(), 1);
        assert_eq!(outcome.results()[0].display_text(), "create_port");
        assert_eq!(outcome.error(), None);
    }

    #[tokio::test]
    async fn test_filter_only_query_is_active() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .withf(|kind, params| {
                *kind == EntityKind::Product
                    && params.query.is_none()
                    && params.filters()[0].path == "product.tag"
            })
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let outcome = run_search(
            &backend,
            EntityKind::Product,
            &QueryInput::parse("tag:FW"),
        )
        .await;
        assert_eq!(outcome, SearchOutcome::Completed(Vec::new()));
    }

    #[tokio::test]
    async fn test_failure_is_contained() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .times(1)
            .returning(|_, _| Err(Error::status(503)));

        let outcome = run_search(
            &backend,
            EntityKind::Process,
            &QueryInput::Text("modify".to_string()),
        )
        .await;

        assert_eq!(
            outcome,
            SearchOutcome::Failed("Search failed with status: 503".to_string())
        );
        assert!(outcome.clone().into_results().is_empty());
    }
}

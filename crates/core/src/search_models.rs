//! Request and response models for the backend search API
//!
//! These types form the wire contract for `POST /api/search/{kind}` and are
//! shared by the translator, the HTTP client and the agent state.

use crate::entities::EntityKind;
use crate::filter::PathFilter;
use crate::results::SearchResult;
use serde::{Deserialize, Serialize};

/// Free-text queries must be longer than this many characters to count
const MIN_ACTIVE_QUERY_CHARS: usize = 1;

/// Action tag carried by every search request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAction {
    #[default]
    Select,
}

/// Canonical search request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub action: SearchAction,
    pub entity_type: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<PathFilter>>,
}

impl SearchParameters {
    /// Build parameters, normalizing an empty query and an empty filter list to absent
    pub fn new(entity_type: EntityKind, query: Option<String>, filters: Vec<PathFilter>) -> Self {
        Self {
            action: SearchAction::Select,
            entity_type,
            query: query.filter(|q| !q.is_empty()),
            filters: if filters.is_empty() {
                None
            } else {
                Some(filters)
            },
        }
    }

    /// Parameters matching everything of a kind (never active)
    pub fn match_all(entity_type: EntityKind) -> Self {
        Self::new(entity_type, None, Vec::new())
    }

    pub fn filters(&self) -> &[PathFilter] {
        self.filters.as_deref().unwrap_or_default()
    }

    /// Whether these parameters warrant a backend call
    ///
    /// True when the query is longer than one character or at least one filter
    /// is present.
    pub fn is_active(&self) -> bool {
        let has_query = self
            .query
            .as_deref()
            .is_some_and(|q| q.chars().count() > MIN_ACTIVE_QUERY_CHARS);
        has_query || !self.filters().is_empty()
    }
}

/// Response body of the search endpoints
///
/// Only `page` is read; a missing page is an empty page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterCondition;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_parameters_inactive() {
        let params = SearchParameters::new(EntityKind::Product, Some(String::new()), vec![]);
        assert_eq!(params.query, None);
        assert_eq!(params.filters, None);
        assert!(!params.is_active());
    }

    #[test]
    fn test_single_char_query_inactive() {
        let params = SearchParameters::new(EntityKind::Product, Some("a".to_string()), vec![]);
        assert!(!params.is_active());
    }

    #[test]
    fn test_two_char_query_active() {
        let params = SearchParameters::new(EntityKind::Product, Some("ab".to_string()), vec![]);
        assert!(params.is_active());
    }

    #[test]
    fn test_filter_alone_is_active() {
        let filter = PathFilter::new("product.tag", FilterCondition::eq(json!("FW")));
        let params = SearchParameters::new(EntityKind::Product, None, vec![filter]);
        assert!(params.is_active());
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let params = SearchParameters::new(EntityKind::Workflow, Some("billing".to_string()), vec![]);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"action": "select", "entity_type": "WORKFLOW", "query": "billing"})
        );
    }

    #[test]
    fn test_response_missing_page_is_empty() {
        let response: SearchResponse = serde_json::from_value(json!({"total": 0})).unwrap();
        assert!(response.page.is_empty());
    }
}

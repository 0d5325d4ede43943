//! State shared with the conversational search agent
//!
//! The agent (`query_agent`) and the UI read and write the same
//! [`SearchAgentState`] cooperatively: whoever writes last wins and readers must
//! tolerate any field being mid-update. The agent fills `parameters` field by
//! field before `results` arrives, so "filters present, no results yet" is the
//! searching phase rather than an empty answer.
//!
//! Plain state only supports the shape heuristics
//! ([`SearchAgentState::has_search_started`],
//! [`SearchAgentState::is_loading_results`]). These cannot tell "still running,
//! nothing yet" from "finished, nothing found". [`AgentStateCell`] versions
//! every write, so when result writes go through
//! [`AgentStateCell::publish_results`] it can report completion explicitly.

use crate::entities::EntityKind;
use crate::filter::PathFilter;
use crate::results::SearchResult;
use crate::search_models::SearchParameters;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Name the agent runtime registers the search agent under
pub const DEFAULT_AGENT_NAME: &str = "query_agent";

/// Search parameters as the agent fills them in
///
/// Every field may be missing or blank while the agent is still working.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<PathFilter>>,
}

impl AgentParameters {
    /// Read parameters from an untrusted JSON value
    ///
    /// Returns `None` when the value is not an object. Filters that do not
    /// parse are skipped individually.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let filters = match object.get("filters") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| match PathFilter::deserialize(item) {
                        Ok(filter) => Some(filter),
                        Err(e) => {
                            warn!("Skipping malformed agent filter: {e}");
                            None
                        }
                    })
                    .collect(),
            ),
            Some(Value::Null) | None => None,
            Some(other) => {
                warn!("Ignoring non-array agent filters: {other}");
                None
            }
        };

        Some(Self {
            action: text("action"),
            entity_type: text("entity_type"),
            query: text("query"),
            filters,
        })
    }

    pub fn filters(&self) -> &[PathFilter] {
        self.filters.as_deref().unwrap_or_default()
    }

    /// The entity kind, once the agent has set a recognised one
    pub fn entity_kind(&self) -> Option<EntityKind> {
        self.entity_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// Canonical parameters, available once the entity kind is known
    pub fn to_search_parameters(&self) -> Option<SearchParameters> {
        let kind = self.entity_kind()?;
        Some(SearchParameters::new(
            kind,
            self.query.clone(),
            self.filters().to_vec(),
        ))
    }

    /// True when the agent has not filled in anything yet
    pub fn is_empty(&self) -> bool {
        self.action.is_none()
            && self.entity_type.is_none()
            && self.query.is_none()
            && self.filters().is_empty()
    }
}

impl From<SearchParameters> for AgentParameters {
    fn from(params: SearchParameters) -> Self {
        let action = serde_json::to_value(params.action)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string));
        Self {
            action,
            entity_type: Some(params.entity_type.to_string()),
            query: params.query,
            filters: params.filters,
        }
    }
}

impl fmt::Display for AgentParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Action: {}", self.action.as_deref().unwrap_or("N/A"))?;
        writeln!(
            f,
            "Entity Type: {}",
            self.entity_type.as_deref().unwrap_or("N/A")
        )?;
        if let Some(query) = &self.query {
            writeln!(f, "Search Query: \"{query}\"")?;
        }
        writeln!(f, "Active Filters:")?;
        if self.filters().is_empty() {
            write!(f, "  No filters applied.")
        } else {
            let lines: Vec<String> = self.filters().iter().map(|flt| format!("  {flt}")).collect();
            write!(f, "{}", lines.join("\n"))
        }
    }
}

/// Bookkeeping the agent keeps alongside the search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// The most recent query sent by the user
    #[serde(default)]
    pub last_query: String,
    #[serde(default, deserialize_with = "lenient_entity_kind")]
    pub last_entity_type: Option<EntityKind>,
    #[serde(default)]
    pub search_count: u64,
    /// Set while the agent is reasoning
    #[serde(default)]
    pub is_thinking: bool,
    #[serde(default)]
    pub last_response: String,
}

fn lenient_entity_kind<'de, D>(deserializer: D) -> Result<Option<EntityKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok()))
}

/// State exchanged with the search agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchAgentState {
    #[serde(default)]
    pub parameters: Option<AgentParameters>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(flatten)]
    pub session: SessionMetadata,
}

/// Where an agent-driven search stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    Completed { result_count: usize },
}

impl SearchAgentState {
    /// Read state from an untrusted JSON value, never failing
    ///
    /// Missing or malformed fields degrade to "not started".
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!("Agent state is not an object, treating as not started");
            return Self::default();
        };

        let parameters = match object.get("parameters") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let parsed = AgentParameters::from_value(raw);
                if parsed.is_none() {
                    warn!("Agent parameters are not an object, ignoring");
                }
                parsed
            }
        };

        let results = match object.get("results") {
            Some(Value::Array(items)) => items.iter().cloned().map(SearchResult::classify).collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                warn!("Agent results are not an array, ignoring");
                Vec::new()
            }
        };

        let session = SessionMetadata::deserialize(value).unwrap_or_else(|e| {
            debug!("Agent session metadata unreadable: {e}");
            SessionMetadata::default()
        });

        Self {
            parameters,
            results,
            session,
        }
    }

    pub fn filters(&self) -> &[PathFilter] {
        self.parameters
            .as_ref()
            .map(AgentParameters::filters)
            .unwrap_or_default()
    }

    /// Parameters exist and carry at least one filter
    pub fn has_search_started(&self) -> bool {
        !self.filters().is_empty()
    }

    /// Search started and no results have arrived.
    ///
    /// A completed search with zero results looks identical; only
    /// [`AgentStateCell::phase`] can tell them apart.
    pub fn is_loading_results(&self) -> bool {
        self.has_search_started() && self.results.is_empty()
    }

    /// Phase derived purely from the state's shape
    pub fn phase(&self) -> SearchPhase {
        if !self.has_search_started() {
            SearchPhase::Idle
        } else if self.is_loading_results() {
            SearchPhase::Searching
        } else {
            SearchPhase::Completed {
                result_count: self.results.len(),
            }
        }
    }
}

/// A value together with the version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

#[derive(Debug, Default)]
struct CellInner {
    state: SearchAgentState,
    version: u64,
    parameters_version: u64,
    results_version: u64,
}

impl CellInner {
    fn bump(&mut self) -> u64 {
        self.version += 1;
        self.version
    }
}

/// Versioned, last-writer-wins holder of the agent state
///
/// Every write bumps a monotonic version. Writes to parameters and results
/// are tracked separately so a results write that follows the latest
/// parameters write marks the search complete, even when it is empty.
#[derive(Debug, Default)]
pub struct AgentStateCell {
    inner: RwLock<CellInner>,
}

impl AgentStateCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SearchAgentState) -> Self {
        let cell = Self::new();
        cell.replace(state);
        cell
    }

    pub fn snapshot(&self) -> Versioned<SearchAgentState> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Versioned {
            version: inner.version,
            value: inner.state.clone(),
        }
    }

    pub fn version(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }

    /// Whether nothing was written since `version` was read
    pub fn is_current(&self, version: u64) -> bool {
        self.version() == version
    }

    /// Overwrite the whole state, as the agent bridge does on every sync
    ///
    /// Results arriving in the same sync as their parameters count as written
    /// after them.
    pub fn replace(&self, state: SearchAgentState) -> u64 {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut version = inner.bump();
        let parameters_changed = inner.state.parameters != state.parameters;
        let results_changed = inner.state.results != state.results;

        if parameters_changed {
            inner.parameters_version = version;
        }
        if results_changed || (parameters_changed && !state.results.is_empty()) {
            if parameters_changed {
                version = inner.bump();
            }
            inner.results_version = version;
        }
        inner.state = state;
        version
    }

    pub fn update_parameters(&self, update: impl FnOnce(&mut AgentParameters)) -> u64 {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let version = inner.bump();
        update(inner.state.parameters.get_or_insert_with(AgentParameters::default));
        inner.parameters_version = version;
        version
    }

    /// Record the agent's answer; an empty list still completes the search
    pub fn publish_results(&self, results: Vec<SearchResult>) -> u64 {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let version = inner.bump();
        inner.state.results = results;
        inner.results_version = version;
        version
    }

    pub fn update_session(&self, update: impl FnOnce(&mut SessionMetadata)) -> u64 {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let version = inner.bump();
        update(&mut inner.state.session);
        version
    }

    /// Phase using write order instead of shape alone
    pub fn phase(&self) -> SearchPhase {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if !inner.state.has_search_started() {
            SearchPhase::Idle
        } else if inner.results_version > inner.parameters_version {
            SearchPhase::Completed {
                result_count: inner.state.results.len(),
            }
        } else {
            SearchPhase::Searching
        }
    }
}

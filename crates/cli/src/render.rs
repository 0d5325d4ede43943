//! Plain-text rendering of search results and agent state

use std::fmt::Write;
use wfo_search_core::{SearchAgentState, SearchPhase, SearchResult};

/// One line per result: position, display text, kind and score
///
/// With `detail` the core record follows each line as indented JSON.
pub fn render_results(results: &[SearchResult], detail: bool) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        let kind = result
            .kind()
            .map_or_else(|| "UNKNOWN".to_string(), |k| k.to_string());
        let _ = write!(out, "{:>3}. {}  [{kind}]", i + 1, result.display_text());
        if let Some(score) = result.score() {
            let _ = write!(out, "  score {score:.4}");
        }
        out.push('\n');

        if detail {
            let record = serde_json::to_string_pretty(result.core_record())
                .unwrap_or_else(|_| result.core_record().to_string());
            for line in record.lines() {
                let _ = writeln!(out, "       {line}");
            }
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// Parameters summary, progress and any results of an agent-driven search
///
/// `agent_name` is the name the search agent is registered under.
pub fn render_agent_state(agent_name: &str, state: &SearchAgentState) -> String {
    let mut out = format!("Agent: {agent_name}\n\n");
    match &state.parameters {
        Some(parameters) => {
            let _ = writeln!(out, "{parameters}");
        }
        None => out.push_str("No search parameters yet.\n"),
    }

    if state.session.is_thinking {
        out.push_str("Agent is thinking...\n");
    }

    match state.phase() {
        SearchPhase::Idle => out.push_str("\nStatus: waiting for the agent to start a search"),
        SearchPhase::Searching => out.push_str("\nStatus: searching..."),
        SearchPhase::Completed { result_count } => {
            let _ = writeln!(out, "\nStatus: {result_count} results\n");
            out.push_str(&render_results(&state.results, false));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_empty_results() {
        assert_eq!(render_results(&[], true), "No results found.");
    }

    #[test]
    fn test_render_results_lines() {
        let results = vec![
            SearchResult::classify(json!({
                "subscription": {"description": "Formatics Fiber"},
                "score": 0.93127
            })),
            SearchResult::classify(json!({"processId": "p-1", "workflowName": "modify_note"})),
            SearchResult::classify(json!({"unexpected": 1})),
        ];

        let rendered = render_results(&results, false);
        assert_eq!(
            rendered,
            "  1. Formatics Fiber  [SUBSCRIPTION]  score 0.9313\n  \
             2. modify_note  [PROCESS]\n  \
             3. Unknown result type  [UNKNOWN]"
        );
    }

    #[test]
    fn test_render_results_detail_shows_core_record() {
        let results = vec![SearchResult::classify(json!({
            "subscription": {"description": "Formatics Fiber"},
            "score": 0.5
        }))];

        let rendered = render_results(&results, true);
        assert!(rendered.contains("\"description\": \"Formatics Fiber\""));
        assert!(!rendered.contains("\"score\""));
    }

    #[test]
    fn test_render_agent_state_phases() {
        let idle = SearchAgentState::from_value(&json!({}));
        let rendered = render_agent_state("query_agent", &idle);
        assert!(rendered.starts_with("Agent: query_agent\n\nNo search parameters yet."));
        assert!(rendered.ends_with("waiting for the agent to start a search"));

        let searching = SearchAgentState::from_value(&json!({
            "parameters": {
                "action": "select",
                "entity_type": "SUBSCRIPTION",
                "query": null,
                "filters": [{"path": "subscription.status", "condition": {"op": "eq", "value": "active"}}]
            },
            "results": []
        }));
        let rendered = render_agent_state("query_agent", &searching);
        assert!(rendered.contains("Entity Type: SUBSCRIPTION"));
        assert!(rendered.contains("  subscription > status eq active"));
        assert!(rendered.ends_with("Status: searching..."));

        let mut completed = searching.clone();
        completed.results = vec![SearchResult::classify(
            json!({"productId": "x", "productType": "FW", "name": "Firewall"}),
        )];
        let rendered = render_agent_state("query_agent", &completed);
        assert!(rendered.contains("Status: 1 results"));
        assert!(rendered.ends_with("Firewall  [PRODUCT]"));
    }

    #[test]
    fn test_render_agent_state_names_configured_agent() {
        let state = SearchAgentState::from_value(&json!({"is_thinking": true}));
        let rendered = render_agent_state("staging_agent", &state);
        assert!(rendered.starts_with("Agent: staging_agent\n"));
        assert!(rendered.contains("Agent is thinking..."));
    }
}

//! Interactive search session
//!
//! A session owns the current query and entity kind of one search view. Query
//! changes are debounced, requests run in the background and only the
//! response to the most recent input is ever applied. Consumers observe the
//! view through a `watch` channel.

use crate::debouncer::Debouncer;
use crate::error::{Result, SessionError};
use crate::search::{execute, SearchOutcome};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wfo_search_core::{
    translate, EntityKind, QueryInput, SearchBackend, SearchConfig, SearchResult,
};

/// Observable state of a search view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub entity_kind: EntityKind,
    /// Latest query as entered, before debouncing
    pub query: QueryInput,
    pub results: Vec<SearchResult>,
    /// A request for the latest input is in flight
    pub loading: bool,
    /// Bumped whenever the entity kind changes; per-view UI state such as a
    /// hovered result belongs to one epoch
    pub reset_epoch: u64,
    /// Message of the last failed search, cleared by the next applied outcome
    pub error: Option<String>,
}

impl SearchView {
    /// Whether the result area should be shown
    pub fn is_search_active(&self) -> bool {
        !self.results.is_empty() || self.loading
    }
}

#[derive(Debug)]
enum Command {
    SetQuery(QueryInput),
    SetEntityKind(EntityKind),
}

#[derive(Debug, Clone, PartialEq)]
struct SearchInput {
    kind: EntityKind,
    query: QueryInput,
}

struct Completion {
    generation: u64,
    outcome: SearchOutcome,
}

enum Event {
    Shutdown,
    Command(Command),
    Settled(SearchInput),
    Completed(Completion),
}

/// Cloneable sender side of a session
#[derive(Debug, Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SearchHandle {
    /// Replace the query; the search runs once the input has been quiet for
    /// the debounce window
    pub fn set_query(&self, query: QueryInput) -> Result<()> {
        self.send(Command::SetQuery(query))
    }

    /// Switch entity kind; the query resets to match-all and results clear
    pub fn set_entity_kind(&self, kind: EntityKind) -> Result<()> {
        self.send(Command::SetEntityKind(kind))
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed)
    }
}

/// A running search session
pub struct SearchSession {
    handle: SearchHandle,
    view: watch::Receiver<SearchView>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SearchSession {
    /// Start a session on the current runtime
    pub fn spawn(backend: Arc<dyn SearchBackend>, config: &SearchConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let initial = SearchView {
            entity_kind: config.default_entity_kind,
            ..SearchView::default()
        };
        let (view_tx, view_rx) = watch::channel(initial);
        let cancel = CancellationToken::new();

        info!(
            "Starting search session for {} (debounce {}ms)",
            config.default_entity_kind, config.debounce_ms
        );

        let driver = SessionDriver {
            backend,
            debouncer: Debouncer::new(config.debounce_duration()),
            commands: command_rx,
            completion_tx,
            completions: completion_rx,
            view: view_tx,
            cancel: cancel.clone(),
            input: SearchInput {
                kind: config.default_entity_kind,
                query: QueryInput::MatchAll,
            },
            generation: 0,
            in_flight: None,
        };
        let task = tokio::spawn(driver.run());

        Self {
            handle: SearchHandle {
                commands: command_tx,
            },
            view: view_rx,
            cancel,
            task,
        }
    }

    pub fn handle(&self) -> SearchHandle {
        self.handle.clone()
    }

    pub fn set_query(&self, query: QueryInput) -> Result<()> {
        self.handle.set_query(query)
    }

    pub fn set_entity_kind(&self, kind: EntityKind) -> Result<()> {
        self.handle.set_entity_kind(kind)
    }

    /// Current view
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    /// Stop the session and wait for its task
    ///
    /// Requests still in flight run to completion but their responses are
    /// dropped.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| SessionError::Task(e.to_string()))
    }
}

struct SessionDriver {
    backend: Arc<dyn SearchBackend>,
    debouncer: Debouncer<SearchInput>,
    commands: mpsc::UnboundedReceiver<Command>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    view: watch::Sender<SearchView>,
    cancel: CancellationToken,
    input: SearchInput,
    /// Bumped on every input change; a response is applied only if it
    /// carries the current generation
    generation: u64,
    /// Generation of the request whose response is still awaited
    in_flight: Option<u64>,
}

impl SessionDriver {
    async fn run(mut self) {
        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => Event::Shutdown,
                command = self.commands.recv() => match command {
                    Some(command) => Event::Command(command),
                    None => Event::Shutdown,
                },
                input = self.debouncer.settled(), if self.debouncer.is_pending() => {
                    Event::Settled(input)
                }
                Some(completion) = self.completions.recv() => Event::Completed(completion),
            };

            match event {
                Event::Shutdown => break,
                Event::Command(command) => self.handle_command(command),
                Event::Settled(input) => self.dispatch(input),
                Event::Completed(completion) => self.apply(completion),
            }
        }
        debug!("Search session stopped");
    }

    fn handle_command(&mut self, command: Command) {
        self.generation += 1;
        match command {
            Command::SetQuery(query) => {
                self.input.query = query.clone();
                self.view.send_modify(|view| view.query = query);
            }
            Command::SetEntityKind(kind) => {
                debug!("Entity kind changed to {kind}");
                self.input = SearchInput {
                    kind,
                    query: QueryInput::MatchAll,
                };
                self.in_flight = None;
                self.view.send_modify(|view| {
                    view.entity_kind = kind;
                    view.query = QueryInput::MatchAll;
                    view.results.clear();
                    view.loading = false;
                    view.error = None;
                    view.reset_epoch += 1;
                });
            }
        }
        self.debouncer.push(self.input.clone());
    }

    fn dispatch(&mut self, input: SearchInput) {
        let parameters = translate(&input.query, input.kind);
        if !parameters.is_active() {
            debug!("Search inactive, clearing results");
            self.in_flight = None;
            self.view.send_modify(|view| {
                view.results.clear();
                view.loading = false;
                view.error = None;
            });
            return;
        }

        let generation = self.generation;
        self.in_flight = Some(generation);
        self.view.send_modify(|view| view.loading = true);

        let backend = Arc::clone(&self.backend);
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let outcome = execute(backend.as_ref(), &parameters).await;
            // The session may already be gone
            let _ = completions.send(Completion {
                generation,
                outcome,
            });
        });
    }

    fn apply(&mut self, completion: Completion) {
        let Completion {
            generation,
            outcome,
        } = completion;

        if generation != self.generation {
            debug!(
                "Discarding stale search response (generation {generation}, current {})",
                self.generation
            );
            if self.in_flight == Some(generation) {
                self.in_flight = None;
                self.view.send_modify(|view| view.loading = false);
            }
            return;
        }

        self.in_flight = None;
        match outcome {
            SearchOutcome::Completed(results) => {
                self.view.send_modify(|view| {
                    view.results = results;
                    view.loading = false;
                    view.error = None;
                });
            }
            SearchOutcome::Failed(message) => {
                warn!("Search failed, clearing results");
                self.view.send_modify(|view| {
                    view.results.clear();
                    view.loading = false;
                    view.error = Some(message);
                });
            }
            SearchOutcome::Inactive => {
                self.view.send_modify(|view| {
                    view.results.clear();
                    view.loading = false;
                    view.error = None;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::sleep;
    use wfo_search_core::MockSearchBackend;

    fn config() -> SearchConfig {
        SearchConfig {
            debounce_ms: 300,
            default_entity_kind: EntityKind::Subscription,
        }
    }

    #[test]
    fn test_search_active_flag() {
        let mut view = SearchView::default();
        assert!(!view.is_search_active());
        view.loading = true;
        assert!(view.is_search_active());
        view.loading = false;
        view.results
            .push(SearchResult::classify(json!({"subscription": {}})));
        assert!(view.is_search_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_character_never_reaches_backend() {
        let mut backend = MockSearchBackend::new();
        backend.expect_search().times(0);

        let session = SearchSession::spawn(Arc::new(backend), &config());
        session
            .set_query(QueryInput::Text("a".to_string()))
            .expect("session open");
        sleep(Duration::from_millis(400)).await;

        let view = session.view();
        assert_eq!(view.query, QueryInput::Text("a".to_string()));
        assert!(view.results.is_empty());
        assert!(!view.loading);
        session.shutdown().await.expect("shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_applied_after_debounce() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .withf(|kind, params| {
                *kind == EntityKind::Subscription && params.query.as_deref() == Some("ab")
            })
            .times(1)
            .returning(|_, _| {
                Ok(vec![SearchResult::classify(
                    json!({"subscription": {"description": "ab fiber"}}),
                )])
            });

        let session = SearchSession::spawn(Arc::new(backend), &config());
        session
            .set_query(QueryInput::Text("ab".to_string()))
            .expect("session open");

        sleep(Duration::from_millis(100)).await;
        assert!(session.view().results.is_empty(), "debounce window not over");

        sleep(Duration::from_millis(300)).await;
        let view = session.view();
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].display_text(), "ab fiber");
        assert!(!view.loading);
        assert_eq!(view.error, None);
        session.shutdown().await.expect("shutdown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_handle_rejects_commands() {
        let backend = MockSearchBackend::new();
        let session = SearchSession::spawn(Arc::new(backend), &config());
        let handle = session.handle();
        session.shutdown().await.expect("shutdown");

        let result = handle.set_query(QueryInput::Text("late".to_string()));
        assert!(matches!(result, Err(SessionError::Closed)));
    }
}

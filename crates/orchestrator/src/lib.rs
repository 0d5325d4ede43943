#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Search orchestration
//!
//! Drives searches from user input:
//! - Debounced query changes with a configurable quiet period
//! - Activity gate so trivial input never reaches the backend
//! - Stale response suppression across rapid input and entity kind changes
//! - Failure containment: a failed search shows an empty result list
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wfo_search_core::{QueryInput, SearchBackend, SearchConfig};
//! use wfo_search_orchestrator::SearchSession;
//!
//! # async fn example(backend: Arc<dyn SearchBackend>) -> Result<(), Box<dyn std::error::Error>> {
//! let session = SearchSession::spawn(backend, &SearchConfig::default());
//! let mut view = session.subscribe();
//!
//! session.set_query(QueryInput::parse("Formatics status:active"))?;
//! while view.changed().await.is_ok() {
//!     println!("{} results", view.borrow().results.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod debouncer;
pub mod error;
mod search;
mod session;

pub use error::{Result, SessionError};
pub use search::{execute, run_search, SearchOutcome};
pub use session::{SearchHandle, SearchSession, SearchView};

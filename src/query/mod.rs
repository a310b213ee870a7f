//! Query service: one question in, the nearest stored FAQ out

mod shell;

use std::sync::Arc;

pub use shell::render_outcome;
pub use shell::run_shell;
use tracing::debug;
use tracing::warn;

use crate::database::FaqStore;
use crate::embeddings::Embedder;
use crate::models::FaqMatch;

/// Word that ends an interactive session
pub const QUIT_COMMAND: &str = "exit";

/// Where a request is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Embedding,
    Searching,
    Responding,
    Terminated,
}

/// Result of handling one input line
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Quit,
    /// Blank line; nothing was embedded or searched
    NoInput,
    Found(FaqMatch),
    /// The store is empty
    NoMatch,
    EmbeddingFailed(String),
    /// The failed read was rolled back before its connection was released
    StorageFailed(String),
}

/// Trimmed, case-insensitive `exit`
pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(QUIT_COMMAND)
}

/// Answers questions one at a time.
///
/// Per-request failures come back as outcomes and leave the service ready
/// for the next line; only `exit` moves it to `Terminated`.
pub struct QueryService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn FaqStore>,
    state: QueryState,
}

impl QueryService {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn FaqStore>) -> Self {
        Self {
            embedder,
            store,
            state: QueryState::Idle,
        }
    }

    pub const fn state(&self) -> QueryState {
        self.state
    }

    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, QueryState::Terminated)
    }

    pub async fn handle(&mut self, line: &str) -> QueryOutcome {
        if self.is_terminated() {
            return QueryOutcome::Quit;
        }

        let question = line.trim();
        if is_quit(question) {
            self.transition(QueryState::Terminated);
            return QueryOutcome::Quit;
        }
        if question.is_empty() {
            return QueryOutcome::NoInput;
        }

        self.transition(QueryState::Embedding);
        let embedding = match self.embedder.embed(question).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Failed to embed question: {}", e);
                self.transition(QueryState::Idle);
                return QueryOutcome::EmbeddingFailed(e.to_string());
            }
        };

        self.transition(QueryState::Searching);
        let nearest = self.store.find_nearest(&embedding).await;

        self.transition(QueryState::Responding);
        let outcome = match nearest {
            Ok(Some(found)) => {
                debug!("Nearest FAQ at distance {:.4}", found.distance);
                QueryOutcome::Found(found)
            }
            Ok(None) => QueryOutcome::NoMatch,
            Err(e) => {
                warn!("Nearest-neighbor lookup failed: {}", e);
                QueryOutcome::StorageFailed(e.to_string())
            }
        };

        self.transition(QueryState::Idle);
        outcome
    }

    fn transition(&mut self, next: QueryState) {
        debug!("Query state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

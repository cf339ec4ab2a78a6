//! Debounced location search.
//!
//! Keystrokes call [`SearchDebouncer::set_query`]; the fetch only fires once
//! the input has been quiet for the debounce window. The pending task is an
//! explicit handle: setting a new query aborts the old task outright, and a
//! sequence check stops a superseded fetch that already completed from
//! publishing over a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::model::Location;
use crate::queries::WeatherQueries;

/// Quiet time required before a query reaches the network.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Where the search flow currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// No query, or one too short to search for.
    #[default]
    Idle,
    /// Waiting out the debounce window or the fetch.
    Pending { query: String },
    Ready {
        query: String,
        results: Arc<Vec<Location>>,
    },
    Failed { query: String, message: String },
}

pub struct SearchDebouncer {
    queries: Arc<WeatherQueries>,
    delay: Duration,
    seq: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    tx: watch::Sender<SearchState>,
}

impl SearchDebouncer {
    pub fn new(queries: Arc<WeatherQueries>) -> Self {
        Self::with_delay(queries, DEBOUNCE_DELAY)
    }

    pub fn with_delay(queries: Arc<WeatherQueries>, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchState::Idle);
        Self {
            queries,
            delay,
            seq: Arc::new(AtomicU64::new(0)),
            pending: None,
            tx,
        }
    }

    /// Watch the search state; every transition is published here.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.tx.borrow().clone()
    }

    /// Record the latest input, cancelling any pending search.
    pub fn set_query(&mut self, query: &str) {
        self.cancel_pending();
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        let trimmed = query.trim().to_string();
        if trimmed.chars().count() < 2 {
            self.tx.send_replace(SearchState::Idle);
            return;
        }

        debug!(query = %trimmed, "debouncing search");
        self.tx.send_replace(SearchState::Pending {
            query: trimmed.clone(),
        });

        let queries = Arc::clone(&self.queries);
        let tx = self.tx.clone();
        let current = Arc::clone(&self.seq);
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = queries.search(&trimmed).await;

            // A newer query took over while we were fetching.
            if current.load(Ordering::SeqCst) != seq {
                return;
            }

            let state = match outcome {
                Ok(results) => SearchState::Ready {
                    query: trimmed,
                    results,
                },
                Err(e) => SearchState::Failed {
                    query: trimmed,
                    message: e.to_string(),
                },
            };
            tx.send_replace(state);
        }));
    }

    /// Abort any pending search and go back to Idle.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.seq.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(SearchState::Idle);
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

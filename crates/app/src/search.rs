//! Debounced search suggestions.
//!
//! Each keystroke cancels the pending delayed fetch and bumps a
//! monotonically increasing generation; a completed fetch is delivered
//! only while its generation is still the latest, so a slow response
//! can never overwrite suggestions for a fresher query.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use crate::api::StorefrontApi;

/// Pause after the last keystroke before fetching, from the source UI.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(200);

/// Queries shorter than this clear the suggestion list instead of
/// hitting the backend.
pub const MIN_QUERY_CHARS: usize = 2;

/// Suggestions delivered for one issued query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionBatch {
    /// Request sequence number; strictly increasing per keystroke.
    pub generation: u64,

    /// The query this batch answers.
    pub query: String,

    /// Suggested completions; empty on short queries and fetch errors.
    pub suggestions: Vec<String>,
}

/// Debounced suggestion fetcher.
///
/// Owned by whichever component renders the search box; batches arrive
/// on the channel handed to [`SuggestionFetcher::new`].
pub struct SuggestionFetcher {
    api: Arc<dyn StorefrontApi>,
    results: mpsc::UnboundedSender<SuggestionBatch>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl fmt::Debug for SuggestionFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("delay", &self.delay)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SuggestionFetcher {
    /// Create a fetcher with the standard debounce delay.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, results: mpsc::UnboundedSender<SuggestionBatch>) -> Self {
        Self::with_delay(api, results, SUGGESTION_DEBOUNCE)
    }

    /// Create a fetcher with a custom debounce delay.
    #[must_use]
    pub fn with_delay(
        api: Arc<dyn StorefrontApi>,
        results: mpsc::UnboundedSender<SuggestionBatch>,
        delay: Duration,
    ) -> Self {
        Self {
            api,
            results,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// The latest issued request generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Record a keystroke.
    ///
    /// Cancels any not-yet-fired delayed fetch. Short queries deliver
    /// an empty batch immediately; others schedule a fetch after the
    /// debounce delay. Fetch failures are logged and delivered as an
    /// empty batch, never propagated.
    pub fn on_input(&mut self, query: &str) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if query.chars().count() < MIN_QUERY_CHARS {
            drop(self.results.send(SuggestionBatch {
                generation,
                query: query.to_string(),
                suggestions: Vec::new(),
            }));

            return;
        }

        let api = Arc::clone(&self.api);
        let latest = Arc::clone(&self.generation);
        let results = self.results.clone();
        let query = query.to_string();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Past the debounce window. The fetch itself detaches so a
            // later keystroke can only outrun it, not abort it; the
            // generation check below drops whichever finishes stale.
            tokio::spawn(async move {
                let suggestions = match api.suggestions(query.clone()).await {
                    Ok(suggestions) => suggestions,
                    Err(error) => {
                        warn!(query = %query, error = %error, "suggestion fetch failed");
                        Vec::new()
                    }
                };

                if latest.load(Ordering::SeqCst) != generation {
                    return;
                }

                drop(results.send(SuggestionBatch {
                    generation,
                    query,
                    suggestions,
                }));
            });
        }));
    }
}

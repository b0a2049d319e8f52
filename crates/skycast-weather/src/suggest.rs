//! Debounced autocomplete over the geocoding client.
//!
//! Each keystroke calls [`SuggestionDebouncer::on_input`]. The call waits
//! out the quiet period before querying, and a newer keystroke supersedes
//! both a pending timer and an in-flight response, so stale suggestions
//! never overwrite newer ones. Dropping the returned future cancels the
//! pending timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::geocode::{GeocodeClient, MIN_QUERY_LEN};
use crate::types::LocationSuggestion;

#[derive(Debug, Clone)]
pub struct SuggestionDebouncer {
    geocode: Arc<GeocodeClient>,
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl SuggestionDebouncer {
    pub fn new(geocode: Arc<GeocodeClient>, delay: Duration) -> Self {
        Self {
            geocode,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle one keystroke of the search box.
    ///
    /// Returns `Some(suggestions)` when this input is still the latest once
    /// the debounce window settles and the lookup finishes, `None` when a
    /// newer keystroke superseded it. A trimmed query shorter than
    /// [`MIN_QUERY_LEN`] resolves immediately to an empty list (closing the
    /// dropdown). Lookup errors resolve to an empty list; autocomplete is
    /// best-effort.
    pub async fn on_input(&self, query: &str) -> Option<Vec<LocationSuggestion>> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Some(Vec::new());
        }
        let trimmed = trimmed.to_string();

        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            return None;
        }

        let suggestions = match self.geocode.suggest(&trimmed).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::debug!("Suggestion lookup failed: {}", e);
                Vec::new()
            }
        };

        // The response may be stale by the time it lands
        if self.generation.load(Ordering::SeqCst) != my_generation {
            return None;
        }

        Some(suggestions)
    }
}

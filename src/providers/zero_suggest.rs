//! Zero-suggest provider: suggestions for an empty input box.
//!
//! Fires only when the box gains focus with no text, surfacing recently
//! visited and most-visited pages. Everything else about the cycle is the
//! same async contract as the other storage-backed providers.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::controller::ResultSink;
use crate::core::input::{AutocompleteInput, InputTrigger};
use crate::core::matches::{AutocompleteMatch, MatchKind, ScoringSignals, ZERO_SUGGEST_BAND};
use crate::providers::Provider;
use crate::scoring;
use crate::stores::{HistoryEntry, HistoryStore};

pub const NAME: &str = "zero-suggest";

const RECENT_LIMIT: usize = 5;
const MOST_VISITED_LIMIT: usize = 5;

pub struct ZeroSuggestProvider {
    store: Arc<dyn HistoryStore>,
    inflight: Mutex<CancellationToken>,
}

impl ZeroSuggestProvider {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            inflight: Mutex::new(CancellationToken::new()),
        }
    }

    fn replace_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut guard = self
            .inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.cancel();
        *guard = token.clone();
        token
    }
}

/// Dedup the recent + most-visited pool by URL, order it by the fast-path
/// frecency variant, and score descending from the top of the zero-suggest
/// band.
fn build_matches(
    recent: Vec<HistoryEntry>,
    most_visited: Vec<HistoryEntry>,
    now_ms: i64,
) -> Vec<AutocompleteMatch> {
    let mut seen = std::collections::HashSet::new();
    let mut pool: Vec<(f64, HistoryEntry)> = recent
        .into_iter()
        .chain(most_visited)
        .filter_map(|entry| {
            if !seen.insert(crate::core::matches::normalize_dedup_key(&entry.url)) {
                return None;
            }
            let score = scoring::simple_frecency(entry.visit_count, entry.last_visit_ms, now_ms);
            Some((score, entry))
        })
        .collect();
    pool.sort_by(|a, b| b.0.total_cmp(&a.0));

    pool.into_iter()
        .enumerate()
        .map(|(position, (score, entry))| {
            let mut m = AutocompleteMatch::new(
                NAME,
                MatchKind::ZeroSuggest,
                entry.url.clone(),
                entry.url.clone(),
            );
            m.description = (!entry.title.is_empty()).then(|| entry.title.clone());
            m.relevance = ZERO_SUGGEST_BAND.clamp(ZERO_SUGGEST_BAND.max - 10 * position as i32);
            m.signals = ScoringSignals {
                visit_count: entry.visit_count.max(0) as u32,
                typed_count: entry.typed_count.max(0) as u32,
                frecency: score,
                url_length: entry.url.len(),
                ..Default::default()
            };
            m
        })
        .collect()
}

impl Provider for ZeroSuggestProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start(&self, input: &AutocompleteInput, sink: &ResultSink) {
        if !input.is_empty() || input.trigger != InputTrigger::Focus {
            sink.finish(NAME);
            return;
        }

        let token = self.replace_token();
        let store = Arc::clone(&self.store);
        let sink = sink.clone();

        tokio::spawn(async move {
            let fetched = tokio::select! {
                _ = token.cancelled() => None,
                results = async {
                    tokio::join!(store.recent(RECENT_LIMIT), store.most_visited(MOST_VISITED_LIMIT))
                } => Some(results),
            };

            match fetched {
                Some((recent, most_visited)) => {
                    let recent = recent.unwrap_or_else(|err| {
                        warn!(%err, "recent history fetch failed");
                        Vec::new()
                    });
                    let most_visited = most_visited.unwrap_or_else(|err| {
                        warn!(%err, "most-visited fetch failed");
                        Vec::new()
                    });
                    sink.deliver(
                        NAME,
                        build_matches(recent, most_visited, scoring::now_ms()),
                    );
                }
                None => {} // Cancelled: silent no-op.
            }
            sink.finish(NAME);
        });
    }

    fn stop(&self) {
        self.inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::VisitKind;

    const NOW: i64 = 1_700_000_000_000;

    fn entry(url: &str, visits: i64) -> HistoryEntry {
        HistoryEntry {
            url: url.to_string(),
            title: format!("{url} title"),
            visit_count: visits,
            typed_count: 0,
            last_visit_ms: NOW - 3_600_000,
            last_visit_kind: VisitKind::Link,
        }
    }

    #[test]
    fn test_dedup_and_frecency_ordering() {
        let matches = build_matches(
            vec![entry("https://a.example.com", 3), entry("https://b.example.com", 2)],
            vec![entry("https://a.example.com", 3), entry("https://c.example.com", 9)],
            NOW,
        );

        // The duplicate collapses; equal recency means visit count decides.
        let keys: Vec<&str> = matches.iter().map(|m| m.dedup_key.as_str()).collect();
        assert_eq!(keys, vec!["c.example.com", "a.example.com", "b.example.com"]);
        assert!(matches[0].relevance > matches[1].relevance);
        assert!(matches[1].relevance > matches[2].relevance);
        assert!(matches.iter().all(|m| m.relevance >= ZERO_SUGGEST_BAND.min
            && m.relevance <= ZERO_SUGGEST_BAND.max));
        assert!(matches.iter().all(|m| !m.allowed_to_be_default));
    }

    #[test]
    fn test_stale_entries_rank_below_fresh_ones() {
        let mut stale = entry("https://old.example.com", 50);
        stale.last_visit_ms = NOW - 30 * 86_400_000;
        let matches = build_matches(vec![entry("https://new.example.com", 2)], vec![stale], NOW);
        assert_eq!(matches[0].dedup_key, "new.example.com");
    }
}

//! Asynchronous history provider backed by the persistent history store.
//!
//! Covers what the in-memory index cannot: the store's own free-text search
//! over the full history corpus. Shares the history-url type space and band
//! with the quick provider; the controller's dedup merges overlap.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::controller::ResultSink;
use crate::core::input::{AutocompleteInput, InputType};
use crate::core::matches::{
    inline_completion_for, AutocompleteMatch, MatchKind, ScoringSignals, HISTORY_URL_BAND,
};
use crate::providers::Provider;
use crate::scoring;
use crate::stores::{HistoryEntry, HistoryStore};
use crate::tokenizer;

pub const NAME: &str = "history-url";

const STORE_QUERY_LIMIT: usize = 10;

pub struct HistoryUrlProvider {
    store: Arc<dyn HistoryStore>,
    inflight: Mutex<CancellationToken>,
}

impl HistoryUrlProvider {
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

fn build_matches(input: &AutocompleteInput, entries: Vec<HistoryEntry>, now_ms: i64) -> Vec<AutocompleteMatch> {
    let terms = input.match_terms();
    entries
        .into_iter()
        .filter_map(|entry| {
            let tokens: Vec<String> = tokenizer::tokenize(&entry.url)
                .into_iter()
                .chain(tokenizer::tokenize(&entry.title))
                .collect();
            if !tokenizer::all_terms_match(&terms, &tokens) {
                return None;
            }

            let quality = if terms.is_empty() {
                0.0
            } else {
                terms
                    .iter()
                    .map(|t| tokenizer::find_best_match(t, &tokens).quality())
                    .sum::<f64>()
                    / terms.len() as f64
            };

            let inline_completion = if input.prevent_inline_autocomplete {
                None
            } else {
                inline_completion_for(&entry.url, &input.text)
            };
            let inline_eligible = inline_completion.is_some();

            let signals = ScoringSignals {
                typed_count: entry.typed_count.max(0) as u32,
                visit_count: entry.visit_count.max(0) as u32,
                elapsed_ms_since_last_visit: now_ms.saturating_sub(entry.last_visit_ms).max(0),
                frecency: scoring::frecency(
                    entry.visit_count,
                    entry.typed_count,
                    entry.last_visit_ms,
                    entry.last_visit_kind,
                    now_ms,
                ),
                match_quality: quality,
                url_length: entry.url.len(),
                ..Default::default()
            };

            let mut m =
                AutocompleteMatch::new(NAME, MatchKind::HistoryUrl, entry.url.clone(), entry.url.clone());
            m.description = (!entry.title.is_empty()).then(|| entry.title.clone());
            m.relevance = scoring::history_relevance(
                &signals,
                input.text.len(),
                HISTORY_URL_BAND,
                inline_eligible,
            );
            m.allowed_to_be_default = inline_eligible;
            m.inline_completion = inline_completion;
            m.signals = signals;
            Some(m)
        })
        .collect()
}

impl Provider for HistoryUrlProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start(&self, input: &AutocompleteInput, sink: &ResultSink) {
        if input.is_empty() || input.input_type == InputType::ForcedQuery {
            sink.finish(NAME);
            return;
        }

        let token = self.replace_token();
        let store = Arc::clone(&self.store);
        let sink = sink.clone();
        let input = input.clone();

        tokio::spawn(async move {
            let fetched = tokio::select! {
                _ = token.cancelled() => None,
                result = store.search(input.query_text(), STORE_QUERY_LIMIT) => Some(result),
            };

            match fetched {
                Some(Ok(entries)) => {
                    let matches = build_matches(&input, entries, scoring::now_ms());
                    sink.deliver(NAME, matches);
                }
                Some(Err(err)) => {
                    // Storage failure degrades to an empty delivery.
                    warn!(%err, "history store search failed");
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

//! Synchronous history provider backed by the in-memory URL index.

use std::sync::Arc;

use crate::core::controller::ResultSink;
use crate::core::input::{AutocompleteInput, InputType};
use crate::core::matches::{
    inline_completion_for, AutocompleteMatch, MatchKind, ScoringSignals, HISTORY_URL_BAND,
};
use crate::index::{QueryHit, UrlIndex};
use crate::providers::Provider;
use crate::scoring;

pub const NAME: &str = "history-quick";

/// At most this many matches per cycle; the async history provider covers
/// the long tail.
const MAX_MATCHES: usize = 3;

pub struct HistoryQuickProvider {
    index: Arc<UrlIndex>,
}

impl HistoryQuickProvider {
    pub fn new(index: Arc<UrlIndex>) -> Self {
        Self { index }
    }

    fn build_match(&self, input: &AutocompleteInput, hit: &QueryHit, now_ms: i64) -> AutocompleteMatch {
        let entry = &hit.entry;

        let inline_completion = if input.prevent_inline_autocomplete {
            None
        } else {
            inline_completion_for(&entry.url, &input.text)
        };
        // A fully typed URL has no remainder but is still the obvious
        // default candidate.
        let fully_typed = input.input_type == InputType::Url
            && crate::core::matches::normalize_dedup_key(&entry.url)
                == crate::core::matches::normalize_dedup_key(&input.text);
        let inline_eligible = inline_completion.is_some();

        let signals = ScoringSignals {
            typed_count: entry.typed_count,
            visit_count: entry.visit_count,
            elapsed_ms_since_last_visit: now_ms.saturating_sub(entry.last_visit_ms).max(0),
            frecency: entry.frecency,
            match_quality: hit.match_quality(),
            is_host_match: hit.is_host_match,
            is_word_boundary_match: hit.is_host_match
                || hit.match_quality() >= 0.75,
            is_bookmarked: false,
            has_open_tab_match: false,
            url_length: entry.url.len(),
        };

        let mut m = AutocompleteMatch::new(NAME, MatchKind::HistoryUrl, entry.url.clone(), entry.url.clone());
        m.description = (!entry.title.is_empty()).then(|| entry.title.clone());
        m.relevance =
            scoring::history_relevance(&signals, input.text.len(), HISTORY_URL_BAND, inline_eligible);
        m.allowed_to_be_default = inline_eligible || fully_typed;
        m.inline_completion = inline_completion;
        m.signals = signals;
        m
    }
}

impl Provider for HistoryQuickProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start(&self, input: &AutocompleteInput, sink: &ResultSink) {
        // Forced queries never produce URL matches; empty input is the
        // zero-suggest provider's territory.
        if input.is_empty() || input.input_type == InputType::ForcedQuery {
            sink.finish(NAME);
            return;
        }

        let now_ms = scoring::now_ms();
        let terms = input.match_terms();
        let mut matches: Vec<AutocompleteMatch> = self
            .index
            .query(&terms)
            .iter()
            .map(|hit| self.build_match(input, hit, now_ms))
            .collect();

        matches.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        matches.truncate(MAX_MATCHES);

        sink.deliver(NAME, matches);
        sink.finish(NAME);
    }

    fn stop(&self) {
        // Fully synchronous; nothing in flight to abort.
    }
}

//! Shortcuts provider: learned input → destination mappings.
//!
//! Every successful navigation records the typed text against the chosen
//! destination; this provider replays those associations, decayed over a
//! 7-day half-life and boosted by how specifically the stored trigger
//! matches the current input.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::controller::ResultSink;
use crate::core::input::{AutocompleteInput, InputType};
use crate::core::matches::{
    inline_completion_for, AutocompleteMatch, MatchKind, ScoringSignals,
    SHORTCUT_DEFAULT_THRESHOLD,
};
use crate::providers::Provider;
use crate::scoring;
use crate::stores::{ShortcutEntry, ShortcutStore};

pub const NAME: &str = "shortcuts";

const MAX_MATCHES: usize = 3;
const STORE_QUERY_LIMIT: usize = 10;

pub struct ShortcutsProvider {
    store: Arc<dyn ShortcutStore>,
    inflight: Mutex<CancellationToken>,
}

impl ShortcutsProvider {
    pub fn new(store: Arc<dyn ShortcutStore>) -> Self {
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

fn build_matches(
    input: &AutocompleteInput,
    entries: Vec<ShortcutEntry>,
    now_ms: i64,
) -> Vec<AutocompleteMatch> {
    let typed = input.text.to_lowercase();
    let mut matches: Vec<AutocompleteMatch> = entries
        .into_iter()
        .filter(|entry| entry.input_text.to_lowercase().starts_with(&typed))
        .map(|entry| {
            let relevance = scoring::shortcut_relevance(
                entry.hit_count,
                entry.last_used_ms,
                typed.len(),
                entry.input_text.len(),
                now_ms,
            );

            let inline_completion = if input.prevent_inline_autocomplete {
                None
            } else {
                inline_completion_for(&entry.destination_url, &input.text)
            };

            let mut m = AutocompleteMatch::new(
                NAME,
                MatchKind::Shortcut,
                entry.destination_url.clone(),
                entry.destination_url.clone(),
            );
            m.description =
                (!entry.destination_title.is_empty()).then(|| entry.destination_title.clone());
            m.relevance = relevance;
            m.allowed_to_be_default =
                relevance >= SHORTCUT_DEFAULT_THRESHOLD && !input.prevent_inline_autocomplete;
            m.inline_completion = inline_completion;
            m.signals = ScoringSignals {
                typed_count: entry.hit_count.max(0) as u32,
                elapsed_ms_since_last_visit: now_ms.saturating_sub(entry.last_used_ms).max(0),
                url_length: entry.destination_url.len(),
                ..Default::default()
            };
            m
        })
        .collect();

    matches.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    matches.truncate(MAX_MATCHES);
    matches
}

impl Provider for ShortcutsProvider {
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
            let query = input.text.to_lowercase();
            let fetched = tokio::select! {
                _ = token.cancelled() => None,
                result = store.search(&query, STORE_QUERY_LIMIT) => Some(result),
            };

            match fetched {
                Some(Ok(entries)) => {
                    let matches = build_matches(&input, entries, scoring::now_ms());
                    sink.deliver(NAME, matches);
                }
                Some(Err(err)) => {
                    warn!(%err, "shortcut store search failed");
                }
                None => {}
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
    use crate::core::input::InputTrigger;
    use crate::core::matches::SHORTCUT_BAND;

    const NOW: i64 = 1_700_000_000_000;

    fn shortcut(input_text: &str, url: &str, hits: i64, last_used_ms: i64) -> ShortcutEntry {
        ShortcutEntry {
            input_text: input_text.to_string(),
            destination_url: url.to_string(),
            destination_title: "Title".to_string(),
            hit_count: hits,
            last_used_ms,
        }
    }

    #[test]
    fn test_previously_selected_destination_ranks_for_same_input() {
        // The user previously chose github.com after typing "gi".
        let input = AutocompleteInput::from_text("gi", InputTrigger::Keystroke);
        let matches = build_matches(
            &input,
            vec![shortcut("gi", "https://github.com", 1, NOW - 1000)],
            NOW,
        );

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.dedup_key, "github.com");
        assert!(m.relevance >= SHORTCUT_DEFAULT_THRESHOLD, "got {}", m.relevance);
        assert!(m.allowed_to_be_default);
        assert_eq!(m.inline_completion.as_deref(), Some("thub.com"));
    }

    #[test]
    fn test_trigger_prefix_filter() {
        let input = AutocompleteInput::from_text("gi", InputTrigger::Keystroke);
        let matches = build_matches(
            &input,
            vec![
                shortcut("gi", "https://github.com", 3, NOW),
                shortcut("mail", "https://mail.example.com", 9, NOW),
            ],
            NOW,
        );
        assert_eq!(matches.len(), 1, "only triggers extending the input match");
    }

    #[test]
    fn test_cap_at_three() {
        let input = AutocompleteInput::from_text("g", InputTrigger::Keystroke);
        let matches = build_matches(
            &input,
            vec![
                shortcut("g1", "https://a.example.com", 1, NOW),
                shortcut("g2", "https://b.example.com", 2, NOW),
                shortcut("g3", "https://c.example.com", 3, NOW),
                shortcut("g4", "https://d.example.com", 4, NOW),
            ],
            NOW,
        );
        assert_eq!(matches.len(), MAX_MATCHES);
        // Highest hit counts survive the cap.
        assert!(matches.iter().all(|m| m.relevance >= SHORTCUT_BAND.min));
        assert_eq!(matches[0].dedup_key, "d.example.com");
    }

    #[test]
    fn test_stale_shortcut_is_not_default() {
        let input = AutocompleteInput::from_text("gi", InputTrigger::Keystroke);
        let two_months = 60 * 86_400_000;
        let matches = build_matches(
            &input,
            vec![shortcut("gi", "https://github.com", 1, NOW - two_months)],
            NOW,
        );
        assert!(matches[0].relevance < SHORTCUT_DEFAULT_THRESHOLD);
        assert!(!matches[0].allowed_to_be_default);
    }
}

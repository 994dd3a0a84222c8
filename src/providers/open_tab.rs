//! Open-tab provider: suggests switching to an already-open tab instead of
//! opening the destination again.
//!
//! Synchronous; the host keeps the tab list in memory. Matches occupy the
//! highest relevance band, and their destination encodes the tab reference
//! as `tab://<id>` for `open_match` to dispatch on.

use std::sync::Arc;

use crate::core::controller::ResultSink;
use crate::core::input::{AutocompleteInput, InputType};
use crate::core::matches::{AutocompleteMatch, MatchKind, ScoringSignals, OPEN_TAB_BAND};
use crate::providers::Provider;
use crate::stores::{TabEntry, TabEnumerator};
use crate::tokenizer;

pub const NAME: &str = "open-tab";

pub struct OpenTabProvider {
    tabs: Arc<dyn TabEnumerator>,
}

impl OpenTabProvider {
    pub fn new(tabs: Arc<dyn TabEnumerator>) -> Self {
        Self { tabs }
    }

    fn build_match(tab: &TabEntry, quality: f64) -> AutocompleteMatch {
        let mut m = AutocompleteMatch::new(
            NAME,
            MatchKind::OpenTab,
            tab.title.clone(),
            format!("tab://{}", tab.id),
        );
        // Dedup against URL-based matches from other providers so the
        // switch-tab suggestion wins the merged entry.
        m.dedup_key = crate::core::matches::normalize_dedup_key(&tab.url);
        m.description = Some(tab.url.clone());
        m.relevance = OPEN_TAB_BAND.place(quality);
        m.signals = ScoringSignals {
            match_quality: quality,
            has_open_tab_match: true,
            url_length: tab.url.len(),
            ..Default::default()
        };
        m
    }
}

impl Provider for OpenTabProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start(&self, input: &AutocompleteInput, sink: &ResultSink) {
        if input.is_empty() || input.input_type == InputType::ForcedQuery {
            sink.finish(NAME);
            return;
        }

        let terms = input.match_terms();
        let mut matches = Vec::new();
        for tab in self.tabs.open_tabs() {
            let tokens: Vec<String> = tokenizer::tokenize(&tab.url)
                .into_iter()
                .chain(tokenizer::tokenize(&tab.title))
                .collect();
            if !tokenizer::all_terms_match(&terms, &tokens) {
                continue;
            }
            let quality = terms
                .iter()
                .map(|t| tokenizer::find_best_match(t, &tokens).quality())
                .sum::<f64>()
                / terms.len().max(1) as f64;
            matches.push(Self::build_match(&tab, quality));
        }

        matches.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        sink.deliver(NAME, matches);
        sink.finish(NAME);
    }

    fn stop(&self) {
        // Synchronous; nothing to abort.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::AutocompleteController;
    use crate::core::input::InputTrigger;

    struct FixedTabs(Vec<TabEntry>);

    impl TabEnumerator for FixedTabs {
        fn open_tabs(&self) -> Vec<TabEntry> {
            self.0.clone()
        }
    }

    fn tab(id: u64, title: &str, url: &str) -> TabEntry {
        TabEntry {
            id,
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    fn run(tabs: Vec<TabEntry>, text: &str) -> Vec<AutocompleteMatch> {
        let provider = OpenTabProvider::new(Arc::new(FixedTabs(tabs)));
        let controller =
            AutocompleteController::new(vec![Arc::new(provider)], |_r, _c| {}, 10);
        controller.start(AutocompleteInput::from_text(text, InputTrigger::Keystroke));
        controller.results()
    }

    #[test]
    fn test_matches_open_tab_in_highest_band() {
        let results = run(
            vec![
                tab(1, "GitHub - rust-lang", "https://github.com/rust-lang"),
                tab(2, "Hacker News", "https://news.ycombinator.com"),
            ],
            "github",
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, MatchKind::OpenTab);
        assert_eq!(results[0].destination_url, "tab://1");
        assert!(results[0].relevance >= OPEN_TAB_BAND.min);
    }

    #[test]
    fn test_dedup_key_is_url_based() {
        let results = run(vec![tab(7, "Example", "https://www.example.com/")], "example");
        assert_eq!(results[0].dedup_key, "example.com");
    }

    #[test]
    fn test_empty_input_matches_nothing() {
        let results = run(vec![tab(1, "GitHub", "https://github.com")], "");
        assert!(results.is_empty());
    }
}

//! Search provider: the verbatim what-you-typed match plus asynchronous
//! network suggestions.
//!
//! The verbatim match is delivered synchronously so the dropdown is never
//! empty on the first frame; suggestion fetches race a cancellation token
//! and die silently with the cycle.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::controller::ResultSink;
use crate::core::input::{AutocompleteInput, InputType};
use crate::core::matches::{
    AutocompleteMatch, MatchKind, NAV_SUGGEST_BAND, SEARCH_SUGGEST_BAND, VERBATIM_RELEVANCE,
};
use crate::providers::Provider;
use crate::stores::{SuggestItem, SuggestionSource};

pub const NAME: &str = "search";

/// Spacing between successive server suggestions when the server did not
/// assign scores itself.
const SUGGEST_STEP: i32 = 10;

pub struct SearchProvider {
    suggest: Arc<dyn SuggestionSource>,
    /// Search destination template with a `{query}` placeholder.
    url_template: String,
    inflight: Mutex<CancellationToken>,
}

impl SearchProvider {
    pub fn new(suggest: Arc<dyn SuggestionSource>, url_template: impl Into<String>) -> Self {
        Self {
            suggest,
            url_template: url_template.into(),
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

    fn verbatim_match(&self, input: &AutocompleteInput) -> AutocompleteMatch {
        if input.input_type == InputType::Url {
            // Typed URLs get a verbatim navigation instead of a search.
            let destination = ensure_scheme(&input.text);
            let mut m =
                AutocompleteMatch::new(NAME, MatchKind::NavSuggest, input.text.clone(), destination);
            m.relevance = VERBATIM_RELEVANCE;
            m.allowed_to_be_default = true;
            return m;
        }

        let query = input.query_text();
        let mut m = AutocompleteMatch::new(
            NAME,
            MatchKind::Verbatim,
            query.to_string(),
            search_url(&self.url_template, query),
        );
        m.description = Some("Search".to_string());
        m.relevance = VERBATIM_RELEVANCE;
        m.allowed_to_be_default = true;
        m
    }
}

fn search_url(template: &str, query: &str) -> String {
    template.replace("{query}", &urlencoding::encode(query))
}

/// Default bare hosts to https.
fn ensure_scheme(text: &str) -> String {
    if text.contains("://") {
        text.to_string()
    } else {
        format!("https://{text}")
    }
}

/// Turn one server suggestion into a match. Positions score descending when
/// the server assigned no relevance of its own.
fn suggestion_match(template: &str, item: &SuggestItem, position: usize) -> AutocompleteMatch {
    if item.is_navigation {
        let destination = item
            .destination_url
            .clone()
            .unwrap_or_else(|| ensure_scheme(&item.text));
        let mut m =
            AutocompleteMatch::new(NAME, MatchKind::NavSuggest, item.text.clone(), destination);
        m.relevance = NAV_SUGGEST_BAND.clamp(
            item.relevance
                .unwrap_or(NAV_SUGGEST_BAND.max - SUGGEST_STEP * position as i32),
        );
        m
    } else {
        let mut m = AutocompleteMatch::new(
            NAME,
            MatchKind::SearchQuery,
            item.text.clone(),
            search_url(template, &item.text),
        );
        m.relevance = SEARCH_SUGGEST_BAND.clamp(
            item.relevance
                .unwrap_or(SEARCH_SUGGEST_BAND.max - SUGGEST_STEP * position as i32),
        );
        m
    }
}

impl Provider for SearchProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start(&self, input: &AutocompleteInput, sink: &ResultSink) {
        if input.is_empty() {
            sink.finish(NAME);
            return;
        }

        sink.deliver(NAME, vec![self.verbatim_match(input)]);

        // Typed URLs are an address, not a query; skip the network round
        // trip and settle immediately.
        if input.input_type == InputType::Url {
            sink.finish(NAME);
            return;
        }

        let token = self.replace_token();
        let suggest = Arc::clone(&self.suggest);
        let sink = sink.clone();
        let template = self.url_template.clone();
        let query = input.query_text().to_string();

        tokio::spawn(async move {
            let fetched = tokio::select! {
                _ = token.cancelled() => None,
                result = suggest.fetch(&query) => Some(result),
            };

            match fetched {
                Some(Ok(response)) => {
                    let matches: Vec<AutocompleteMatch> = response
                        .items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| suggestion_match(&template, item, i))
                        .collect();
                    sink.deliver(NAME, matches);
                }
                Some(Err(err)) => {
                    warn!(%err, "suggestion fetch failed");
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

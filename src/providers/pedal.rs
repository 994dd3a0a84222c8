//! Pedal provider: fixed command phrases surfaced as omnibox matches.
//!
//! A pedal maps a handful of trigger phrasings onto one in-app action; the
//! destination encodes the action as `pedal://<slug>` for `open_match` to
//! dispatch.

use once_cell::sync::Lazy;

use crate::core::controller::ResultSink;
use crate::core::input::AutocompleteInput;
use crate::core::matches::{AutocompleteMatch, MatchKind, PEDAL_RELEVANCE};
use crate::providers::Provider;

pub const NAME: &str = "pedal";

/// One built-in command.
pub struct Pedal {
    pub slug: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub phrases: &'static [&'static str],
}

/// The fixed pedal catalog.
pub static PEDALS: Lazy<Vec<Pedal>> = Lazy::new(|| {
    vec![
        Pedal {
            slug: "open-settings",
            label: "Open settings",
            description: "Go to the settings page",
            phrases: &["open settings", "settings", "preferences"],
        },
        Pedal {
            slug: "open-new-window",
            label: "Open new window",
            description: "Open a new browser window",
            phrases: &["open new window", "new window"],
        },
        Pedal {
            slug: "open-extensions",
            label: "Open extensions",
            description: "Manage installed extensions",
            phrases: &["open extensions", "extensions", "manage extensions"],
        },
    ]
});

/// Find the pedal whose phrase list contains the normalized input, if any.
pub fn match_pedal(text: &str) -> Option<&'static Pedal> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    PEDALS
        .iter()
        .find(|pedal| pedal.phrases.iter().any(|p| *p == normalized))
}

pub struct PedalProvider;

impl PedalProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PedalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for PedalProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start(&self, input: &AutocompleteInput, sink: &ResultSink) {
        if let Some(pedal) = match_pedal(&input.text) {
            let mut m = AutocompleteMatch::new(
                NAME,
                MatchKind::Pedal,
                pedal.label,
                format!("pedal://{}", pedal.slug),
            );
            m.description = Some(pedal.description.to_string());
            m.relevance = PEDAL_RELEVANCE;
            sink.deliver(NAME, vec![m]);
        }
        sink.finish(NAME);
    }

    fn stop(&self) {
        // Synchronous; nothing to abort.
    }
}

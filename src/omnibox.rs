//! The omnibox facade: the single entry point the UI talks to.
//!
//! Classifies and tokenizes raw input, drives the controller per the cycle
//! rules, and turns a selected match into a navigation action. Successful
//! navigations record shortcut usage as a fire-and-forget side effect.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::config::OmniboxConfig;
use crate::core::controller::{AutocompleteController, ControllerState};
use crate::core::input::{AutocompleteInput, InputTrigger};
use crate::core::matches::{AutocompleteMatch, MatchKind};
use crate::index::UrlIndex;
use crate::providers::{
    BookmarkProvider, HistoryQuickProvider, HistoryUrlProvider, OpenTabProvider, PedalProvider,
    Provider, SearchProvider, ShortcutsProvider, ZeroSuggestProvider,
};
use crate::error::{OmniboxError, OmniboxResult};
use crate::stores::{
    BookmarkStore, HistoryStore, ShortcutStore, SuggestionSource, TabEnumerator,
};

/// Where the host should open a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenDisposition {
    CurrentTab,
    NewTab,
}

/// In-app actions pedals map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedalAction {
    OpenSettings,
    OpenNewWindow,
    OpenExtensions,
}

impl PedalAction {
    fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "open-settings" => Some(Self::OpenSettings),
            "open-new-window" => Some(Self::OpenNewWindow),
            "open-extensions" => Some(Self::OpenExtensions),
            _ => None,
        }
    }
}

/// What the host must do for a selected match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    Navigate {
        url: String,
        disposition: OpenDisposition,
    },
    SwitchToTab {
        tab_id: u64,
    },
    RunPedal {
        action: PedalAction,
    },
}

/// The host collaborators the engine consumes.
#[derive(Clone)]
pub struct HostServices {
    pub history: Arc<dyn HistoryStore>,
    pub shortcuts: Arc<dyn ShortcutStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub tabs: Arc<dyn TabEnumerator>,
    pub suggestions: Arc<dyn SuggestionSource>,
}

/// One omnibox instance: a configured provider set behind a controller.
pub struct Omnibox {
    controller: AutocompleteController,
    shortcuts: Arc<dyn ShortcutStore>,
    last_text: Mutex<Option<String>>,
}

impl Omnibox {
    /// Build the standard provider set. Registration order doubles as the
    /// tie-break priority order in the merged result list.
    pub fn new(
        config: &OmniboxConfig,
        services: HostServices,
        index: Arc<UrlIndex>,
        on_update: impl Fn(&[AutocompleteMatch], bool) + Send + Sync + 'static,
    ) -> Self {
        let flags = &config.providers;
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        if flags.open_tabs {
            providers.push(Arc::new(OpenTabProvider::new(Arc::clone(&services.tabs))));
        }
        if flags.shortcuts {
            providers.push(Arc::new(ShortcutsProvider::new(Arc::clone(
                &services.shortcuts,
            ))));
        }
        if flags.history_quick {
            providers.push(Arc::new(HistoryQuickProvider::new(index)));
        }
        if flags.history_url {
            providers.push(Arc::new(HistoryUrlProvider::new(Arc::clone(
                &services.history,
            ))));
        }
        if flags.search {
            providers.push(Arc::new(SearchProvider::new(
                Arc::clone(&services.suggestions),
                config.search.url_template.clone(),
            )));
        }
        if flags.zero_suggest {
            providers.push(Arc::new(ZeroSuggestProvider::new(Arc::clone(
                &services.history,
            ))));
        }
        if flags.pedals {
            providers.push(Arc::new(PedalProvider::new()));
        }
        if flags.bookmarks {
            providers.push(Arc::new(BookmarkProvider::new(Arc::clone(
                &services.bookmarks,
            ))));
        }

        Self {
            controller: AutocompleteController::new(
                providers,
                on_update,
                config.general.max_results,
            ),
            shortcuts: services.shortcuts,
            last_text: Mutex::new(None),
        }
    }

    /// Build an omnibox over a custom provider set.
    pub fn with_providers(
        providers: Vec<Arc<dyn Provider>>,
        shortcuts: Arc<dyn ShortcutStore>,
        max_results: usize,
        on_update: impl Fn(&[AutocompleteMatch], bool) + Send + Sync + 'static,
    ) -> Self {
        Self {
            controller: AutocompleteController::new(providers, on_update, max_results),
            shortcuts,
            last_text: Mutex::new(None),
        }
    }

    /// Handle one keystroke/focus/paste event.
    ///
    /// A keystroke with unchanged text (arrow-key navigation) does not
    /// re-issue the query; a focus event with unchanged text does, so
    /// zero-suggest gets its chance.
    pub fn handle_input(&self, text: &str, trigger: InputTrigger) {
        let trimmed = text.trim().to_string();
        {
            let mut last = self.lock_last_text();
            if trigger == InputTrigger::Keystroke && last.as_deref() == Some(trimmed.as_str()) {
                debug!("unchanged keystroke text, keeping current cycle");
                return;
            }
            *last = Some(trimmed.clone());
        }

        let input = AutocompleteInput::from_text(&trimmed, trigger);
        self.controller.start(input);
    }

    /// Cancel the in-flight cycle, if any.
    pub fn stop_query(&self) {
        *self.lock_last_text() = None;
        self.controller.stop();
    }

    /// Translate a selected match into the action the host must perform.
    ///
    /// Navigations record the (input, destination) pair in the shortcut
    /// store without blocking.
    pub fn open_match(
        &self,
        m: &AutocompleteMatch,
        disposition: OpenDisposition,
    ) -> OmniboxResult<NavigationAction> {
        let action = match m.kind {
            MatchKind::OpenTab => {
                let id = m
                    .destination_url
                    .strip_prefix("tab://")
                    .and_then(|id| id.parse::<u64>().ok())
                    .ok_or_else(|| {
                        OmniboxError::Navigation(format!(
                            "malformed tab reference: {}",
                            m.destination_url
                        ))
                    })?;
                NavigationAction::SwitchToTab { tab_id: id }
            }
            MatchKind::Pedal => {
                let action = m
                    .destination_url
                    .strip_prefix("pedal://")
                    .and_then(PedalAction::from_slug)
                    .ok_or_else(|| {
                        OmniboxError::Navigation(format!(
                            "unknown pedal: {}",
                            m.destination_url
                        ))
                    })?;
                NavigationAction::RunPedal { action }
            }
            _ => NavigationAction::Navigate {
                url: m.destination_url.clone(),
                disposition,
            },
        };

        if let NavigationAction::Navigate { .. } = &action {
            self.record_shortcut(m);
        }

        Ok(action)
    }

    pub fn results(&self) -> Vec<AutocompleteMatch> {
        self.controller.results()
    }

    pub fn default_match(&self) -> Option<AutocompleteMatch> {
        self.controller.default_match()
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    fn record_shortcut(&self, m: &AutocompleteMatch) {
        let Some(input_text) = self.lock_last_text().clone() else {
            return;
        };
        if input_text.is_empty() {
            return;
        }

        let store = Arc::clone(&self.shortcuts);
        let destination_url = m.destination_url.clone();
        let destination_title = m.description.clone().unwrap_or_default();
        let kind = m.kind;

        // Fire-and-forget; a missing runtime or store error only loses the
        // learning signal, never the navigation.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = store
                        .record_usage(&input_text, &destination_url, &destination_title, kind)
                        .await
                    {
                        warn!(%err, "failed to record shortcut usage");
                    }
                });
            }
            Err(_) => warn!("no async runtime, skipping shortcut recording"),
        }
    }

    fn lock_last_text(&self) -> MutexGuard<'_, Option<String>> {
        self.last_text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pedal_action_from_slug() {
        assert_eq!(
            PedalAction::from_slug("open-settings"),
            Some(PedalAction::OpenSettings)
        );
        assert_eq!(
            PedalAction::from_slug("open-new-window"),
            Some(PedalAction::OpenNewWindow)
        );
        assert_eq!(
            PedalAction::from_slug("open-extensions"),
            Some(PedalAction::OpenExtensions)
        );
        assert_eq!(PedalAction::from_slug("nope"), None);
    }
}

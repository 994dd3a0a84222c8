//! Consumed host interfaces: history, shortcuts, bookmarks, open tabs, and
//! the network suggestion source.
//!
//! The engine only ever talks to these traits; hosts supply the actual
//! storage and network plumbing. Adapter failures use `anyhow` — providers
//! catch them at the boundary and degrade to empty deliveries, so no typed
//! error ever crosses into the controller. Every async call is expected to
//! be cancel-safe: providers race them against a cancellation token and
//! drop the future when the cycle dies.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::matches::MatchKind;

/// How a history entry was last reached. Weights the frecency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitKind {
    Link,
    Typed,
    Bookmark,
    Redirect,
    Reload,
}

/// One URL's visit record as the history store reports it.
///
/// Counts are signed because they come from untrusted persisted state; the
/// scoring model clamps negatives to zero rather than rejecting the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub visit_count: i64,
    pub typed_count: i64,
    /// Milliseconds since the Unix epoch.
    pub last_visit_ms: i64,
    pub last_visit_kind: VisitKind,
}

/// A learned input → destination mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutEntry {
    /// The input text the user typed when this shortcut was recorded.
    pub input_text: String,
    pub destination_url: String,
    pub destination_title: String,
    pub hit_count: i64,
    pub last_used_ms: i64,
}

/// A currently open tab in the active window/profile scope.
#[derive(Debug, Clone)]
pub struct TabEntry {
    pub id: u64,
    pub title: String,
    pub url: String,
}

/// One item of a network suggestion response.
#[derive(Debug, Clone)]
pub struct SuggestItem {
    pub text: String,
    /// Present for navigation suggestions.
    pub destination_url: Option<String>,
    /// Server-assigned relevance, if any.
    pub relevance: Option<i32>,
    pub is_navigation: bool,
}

/// Structured response from the suggestion endpoint.
#[derive(Debug, Clone, Default)]
pub struct SuggestResponse {
    pub items: Vec<SuggestItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestItem {
    text: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    relevance: Option<i32>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestResponse {
    #[serde(default)]
    suggestions: Vec<RawSuggestItem>,
}

impl SuggestResponse {
    /// Parse the suggestion endpoint's JSON body. Hosts implementing
    /// [`SuggestionSource`] over HTTP can feed the raw response through
    /// here.
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawSuggestResponse =
            serde_json::from_str(body).context("malformed suggest response")?;
        let items = raw
            .suggestions
            .into_iter()
            .map(|item| SuggestItem {
                is_navigation: item.kind.as_deref() == Some("navigation") || item.url.is_some(),
                text: item.text,
                destination_url: item.url,
                relevance: item.relevance,
            })
            .collect();
        Ok(Self { items })
    }
}

/// Persistent history storage.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Entries significant enough to live in the in-memory index.
    async fn significant_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Free-text history search, used when the in-memory index lacks
    /// coverage.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<HistoryEntry>>;

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>>;

    async fn most_visited(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
}

/// Learned-shortcut persistence.
#[async_trait]
pub trait ShortcutStore: Send + Sync {
    async fn search(&self, input_text: &str, limit: usize) -> Result<Vec<ShortcutEntry>>;

    /// Record that `input_text` led the user to `destination_url`.
    /// Fire-and-forget from the facade; must not block navigation.
    async fn record_usage(
        &self,
        input_text: &str,
        destination_url: &str,
        destination_title: &str,
        kind: MatchKind,
    ) -> Result<()>;
}

/// Bookmark storage. Not yet implemented upstream; hosts return empty/false.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<HistoryEntry>>;

    async fn is_bookmarked(&self, url: &str) -> Result<bool>;

    async fn all(&self) -> Result<Vec<HistoryEntry>>;
}

/// Enumerates open tabs. Synchronous: the host keeps this in memory.
pub trait TabEnumerator: Send + Sync {
    fn open_tabs(&self) -> Vec<TabEntry>;
}

/// Network suggestion endpoint for the search provider.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<SuggestResponse>;
}

//! Autocomplete match model: the records providers produce and the controller
//! merges, plus the relevance bands that keep cross-provider scores
//! comparable.

/// Kind of suggestion a match represents. Drives UI treatment, the
/// tie-breaking order during merge, and how `open_match` dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Switch to an already-open tab.
    OpenTab,
    /// A learned input → destination shortcut.
    Shortcut,
    /// A history-derived URL suggestion.
    HistoryUrl,
    /// Search exactly what was typed.
    Verbatim,
    /// A server-suggested search query.
    SearchQuery,
    /// A server-suggested navigation target.
    NavSuggest,
    /// Suggestion shown for empty input on focus.
    ZeroSuggest,
    /// A built-in command phrase ("open settings").
    Pedal,
    /// Bookmark suggestion (provider is a stub upstream).
    Bookmark,
}

impl MatchKind {
    /// Tie-break priority when two matches share a relevance score. Lower
    /// sorts first. The order mirrors provider registration and is policy,
    /// not law — see DESIGN.md.
    pub fn priority(self) -> u8 {
        match self {
            MatchKind::OpenTab => 0,
            MatchKind::Shortcut => 1,
            MatchKind::HistoryUrl => 2,
            MatchKind::Verbatim | MatchKind::SearchQuery | MatchKind::NavSuggest => 3,
            MatchKind::ZeroSuggest => 4,
            MatchKind::Pedal => 5,
            MatchKind::Bookmark => 6,
        }
    }
}

/// An inclusive integer relevance range owned by a match kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub min: i32,
    pub max: i32,
}

impl Band {
    /// Map a [0, 1] score onto the band.
    pub fn place(self, score: f64) -> i32 {
        let score = score.clamp(0.0, 1.0);
        self.min + (score * (self.max - self.min) as f64).round() as i32
    }

    /// Clamp an adjusted relevance back into the band.
    pub fn clamp(self, relevance: i32) -> i32 {
        relevance.clamp(self.min, self.max)
    }
}

/// Open-tab matches outrank everything else.
pub const OPEN_TAB_BAND: Band = Band { min: 1500, max: 1599 };
pub const SHORTCUT_BAND: Band = Band { min: 1000, max: 1450 };
pub const HISTORY_URL_BAND: Band = Band { min: 900, max: 1400 };
pub const SEARCH_SUGGEST_BAND: Band = Band { min: 550, max: 840 };
/// Navigation suggestions sit one notch above query suggestions.
pub const NAV_SUGGEST_BAND: Band = Band { min: 551, max: 841 };
pub const ZERO_SUGGEST_BAND: Band = Band { min: 500, max: 700 };

/// Fixed score for searching the verbatim input.
pub const VERBATIM_RELEVANCE: i32 = 850;
/// Fixed score for pedal command matches.
pub const PEDAL_RELEVANCE: i32 = 1150;
/// A shortcut may become the default match once it reaches this score.
pub const SHORTCUT_DEFAULT_THRESHOLD: i32 = 1200;

/// Behavioral and match-quality features attached to a match at creation
/// time. Never mutated afterwards except for the open-tab cross-reference
/// set during merge.
#[derive(Debug, Clone, Default)]
pub struct ScoringSignals {
    pub typed_count: u32,
    pub visit_count: u32,
    pub elapsed_ms_since_last_visit: i64,
    pub frecency: f64,
    /// Aggregate term-match quality in [0, 1].
    pub match_quality: f64,
    pub is_host_match: bool,
    pub is_word_boundary_match: bool,
    pub is_bookmarked: bool,
    pub has_open_tab_match: bool,
    pub url_length: usize,
}

/// A single ranked suggestion. Produced by one provider, read-only for the
/// controller and UI.
#[derive(Debug, Clone)]
pub struct AutocompleteMatch {
    pub provider: &'static str,
    pub relevance: i32,
    /// Primary display line (URL or suggestion text).
    pub contents: String,
    /// Secondary display line (page title, annotation).
    pub description: Option<String>,
    /// Where selecting the match goes. Open-tab and pedal matches encode
    /// their target as `tab://<id>` / `pedal://<slug>`.
    pub destination_url: String,
    pub kind: MatchKind,
    /// Greyed-out completion appended after the caret, if eligible.
    pub inline_completion: Option<String>,
    pub allowed_to_be_default: bool,
    /// Normalized URL used to merge equivalent matches across providers.
    pub dedup_key: String,
    pub signals: ScoringSignals,
}

impl AutocompleteMatch {
    /// Create a match with neutral defaults; callers fill in scoring fields.
    pub fn new(
        provider: &'static str,
        kind: MatchKind,
        contents: impl Into<String>,
        destination_url: impl Into<String>,
    ) -> Self {
        let destination_url = destination_url.into();
        let dedup_key = normalize_dedup_key(&destination_url);
        Self {
            provider,
            relevance: 0,
            contents: contents.into(),
            description: None,
            destination_url,
            kind,
            inline_completion: None,
            allowed_to_be_default: false,
            dedup_key,
            signals: ScoringSignals::default(),
        }
    }
}

/// Normalize a URL into a dedup key: lowercase, scheme and `www.` stripped,
/// trailing slash removed. `http://Example.com/` and `https://www.example.com`
/// collapse to the same key.
pub fn normalize_dedup_key(url: &str) -> String {
    let mut key = url.trim().to_lowercase();
    if let Some(rest) = key.split_once("://").map(|(_, rest)| rest.to_string()) {
        key = rest;
    }
    if let Some(rest) = key.strip_prefix("www.") {
        key = rest.to_string();
    }
    while key.ends_with('/') {
        key.pop();
    }
    key
}

/// Strip scheme and `www.` for display and inline-completion comparisons.
pub fn strip_url_prefix(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    rest.strip_prefix("www.").unwrap_or(rest)
}

/// Compute the inline completion `typed` would need to become `url`, if the
/// typed text is a prefix of the URL (raw or with scheme/`www.` stripped).
/// A remainder of zero length means the URL is already fully typed and there
/// is nothing to complete.
pub fn inline_completion_for(url: &str, typed: &str) -> Option<String> {
    let typed = typed.trim().to_lowercase();
    if typed.is_empty() {
        return None;
    }
    let url_lower = url.to_lowercase();
    for candidate in [url_lower.as_str(), strip_url_prefix(&url_lower)] {
        if candidate.starts_with(&typed) {
            let remainder = &candidate[typed.len()..];
            if remainder.is_empty() {
                return None;
            }
            return Some(remainder.to_string());
        }
    }
    None
}

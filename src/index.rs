//! In-memory URL index: a synchronous lookup structure over significant
//! history entries.
//!
//! The index keeps an inverted token → entry-id map so multi-term queries
//! walk the token vocabulary instead of scanning every entry. Refresh is a
//! wholesale rebuild: a new snapshot is constructed off to the side and then
//! swapped in atomically, so concurrent queries always see either the old or
//! the new snapshot, never a partially built one.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::scoring;
use crate::stores::{HistoryEntry, VisitKind};
use crate::tokenizer::{self, TermMatch};

/// Default visit-count floor for an entry to be considered significant.
pub const DEFAULT_MIN_VISIT_COUNT: u32 = 2;

/// A significant-history record, tokenized and scored at rebuild time.
/// Owned exclusively by the index; never mutated after the snapshot is
/// published.
#[derive(Debug)]
pub struct IndexEntry {
    pub url: String,
    pub title: String,
    pub url_tokens: Vec<String>,
    pub title_tokens: Vec<String>,
    /// Tokens of the host part of the URL, for host-match detection.
    pub host_tokens: Vec<String>,
    pub visit_count: u32,
    pub typed_count: u32,
    pub last_visit_ms: i64,
    pub last_visit_kind: VisitKind,
    pub frecency: f64,
}

impl IndexEntry {
    /// Best match for `term` across URL and title tokens.
    pub fn best_match(&self, term: &str) -> TermMatch {
        let from_url = tokenizer::find_best_match(term, &self.url_tokens);
        if from_url == TermMatch::Exact {
            return TermMatch::Exact;
        }
        from_url.max(tokenizer::find_best_match(term, &self.title_tokens))
    }
}

/// One query result: the entry plus per-term match information for the
/// consuming provider's scoring.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub entry: Arc<IndexEntry>,
    /// Best match class per input term, in term order.
    pub term_matches: Vec<TermMatch>,
    /// True when every term matches within the URL's host.
    pub is_host_match: bool,
}

impl QueryHit {
    /// Aggregate match quality in [0, 1]: the mean of per-term qualities.
    pub fn match_quality(&self) -> f64 {
        if self.term_matches.is_empty() {
            return 0.0;
        }
        self.term_matches.iter().map(|m| m.quality()).sum::<f64>()
            / self.term_matches.len() as f64
    }
}

#[derive(Default)]
struct Snapshot {
    entries: Vec<Arc<IndexEntry>>,
    /// Inverted index: token → ids of entries containing it. BTreeMap keeps
    /// vocabulary iteration deterministic.
    postings: BTreeMap<String, Vec<u32>>,
}

/// The index itself: a swappable snapshot behind a read lock.
pub struct UrlIndex {
    snapshot: RwLock<Arc<Snapshot>>,
    min_visit_count: u32,
}

impl UrlIndex {
    pub fn new() -> Self {
        Self::with_min_visits(DEFAULT_MIN_VISIT_COUNT)
    }

    pub fn with_min_visits(min_visit_count: u32) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            min_visit_count,
        }
    }

    /// Rebuild the whole index from the history store's significant entries.
    ///
    /// Entries qualify when they were ever typed or have enough visits.
    /// The new snapshot replaces the old one atomically.
    pub fn rebuild(&self, history: &[HistoryEntry], now_ms: i64) {
        let mut snapshot = Snapshot::default();

        for record in history {
            let visit_count = record.visit_count.max(0) as u32;
            let typed_count = record.typed_count.max(0) as u32;
            if typed_count == 0 && visit_count < self.min_visit_count {
                continue;
            }

            let id = snapshot.entries.len() as u32;
            let entry = Arc::new(IndexEntry {
                url_tokens: tokenizer::tokenize(&record.url),
                title_tokens: tokenizer::tokenize(&record.title),
                host_tokens: tokenizer::tokenize(host_part(&record.url)),
                url: record.url.clone(),
                title: record.title.clone(),
                visit_count,
                typed_count,
                last_visit_ms: record.last_visit_ms,
                last_visit_kind: record.last_visit_kind,
                frecency: scoring::frecency(
                    record.visit_count,
                    record.typed_count,
                    record.last_visit_ms,
                    record.last_visit_kind,
                    now_ms,
                ),
            });

            let mut seen = HashSet::new();
            for token in entry.url_tokens.iter().chain(entry.title_tokens.iter()) {
                if seen.insert(token.clone()) {
                    snapshot.postings.entry(token.clone()).or_default().push(id);
                }
            }
            snapshot.entries.push(entry);
        }

        debug!(
            entries = snapshot.entries.len(),
            tokens = snapshot.postings.len(),
            "rebuilt url index"
        );

        *self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::new(snapshot);
    }

    /// All entries where every term matches at least one URL or title token.
    ///
    /// Pre-filter order is unspecified; ranking happens in the consuming
    /// provider.
    pub fn query(&self, terms: &[String]) -> Vec<QueryHit> {
        if terms.is_empty() {
            return Vec::new();
        }
        let snapshot = self.current();

        // Intersect per-term candidate sets gathered from the vocabulary.
        let mut candidates: Option<HashSet<u32>> = None;
        for term in terms {
            let mut ids = HashSet::new();
            for (token, posting) in snapshot.postings.iter() {
                if tokenizer::match_term(term, token).is_match() {
                    ids.extend(posting.iter().copied());
                }
            }
            candidates = Some(match candidates {
                None => ids,
                Some(prev) => prev.intersection(&ids).copied().collect(),
            });
            if candidates.as_ref().is_some_and(|c| c.is_empty()) {
                return Vec::new();
            }
        }

        let mut ids: Vec<u32> = candidates.unwrap_or_default().into_iter().collect();
        ids.sort_unstable();

        ids.into_iter()
            .map(|id| {
                let entry = Arc::clone(&snapshot.entries[id as usize]);
                let term_matches = terms.iter().map(|t| entry.best_match(t)).collect();
                let is_host_match = tokenizer::all_terms_match(terms, &entry.host_tokens);
                QueryHit {
                    entry,
                    term_matches,
                    is_host_match,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.current().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().entries.is_empty()
    }

    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(
            &self
                .snapshot
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl Default for UrlIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// The host portion of a URL: everything between the scheme and the first
/// path separator.
fn host_part(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn entry(url: &str, title: &str, visits: i64, typed: i64) -> HistoryEntry {
        HistoryEntry {
            url: url.to_string(),
            title: title.to_string(),
            visit_count: visits,
            typed_count: typed,
            last_visit_ms: NOW - 3_600_000,
            last_visit_kind: VisitKind::Typed,
        }
    }

    fn sample_index() -> UrlIndex {
        let index = UrlIndex::new();
        index.rebuild(
            &[
                entry("https://github.com/rust-lang/cargo", "Cargo repository", 12, 4),
                entry("https://docs.rs/serde", "serde - Rust docs", 8, 0),
                entry("https://news.ycombinator.com", "Hacker News", 30, 2),
                entry("https://example.com/once", "Visited once", 1, 0),
            ],
            NOW,
        );
        index
    }

    #[test]
    fn test_significance_filter() {
        let index = sample_index();
        // The single-visit, never-typed entry is excluded.
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_query_and_semantics() {
        let index = sample_index();

        let hits = index.query(&["rust".into()]);
        let urls: Vec<&str> = hits.iter().map(|h| h.entry.url.as_str()).collect();
        assert!(urls.contains(&"https://github.com/rust-lang/cargo"));
        assert!(urls.contains(&"https://docs.rs/serde"), "title token matches");

        // Both terms must match the same entry.
        let hits = index.query(&["rust".into(), "cargo".into()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.url, "https://github.com/rust-lang/cargo");

        assert!(index.query(&["rust".into(), "python".into()]).is_empty());
        assert!(index.query(&[]).is_empty());
    }

    #[test]
    fn test_query_prefix_and_substring() {
        let index = sample_index();
        let hits = index.query(&["ycomb".into()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term_matches[0], TermMatch::Prefix);

        let hits = index.query(&["combinator".into()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].term_matches[0], TermMatch::Substring);
    }

    #[test]
    fn test_host_match_flag() {
        let index = sample_index();
        let hits = index.query(&["github".into()]);
        assert!(hits[0].is_host_match);

        let hits = index.query(&["cargo".into()]);
        let hit = hits
            .iter()
            .find(|h| h.entry.url.contains("github"))
            .unwrap();
        assert!(!hit.is_host_match, "path-only match is not a host match");
    }

    #[test]
    fn test_match_quality() {
        let index = sample_index();
        let hits = index.query(&["serde".into()]);
        assert!((hits[0].match_quality() - 1.0).abs() < 1e-9, "exact term");
    }

    #[test]
    fn test_rebuild_replaces_snapshot() {
        let index = sample_index();
        index.rebuild(&[entry("https://new.example.com", "New", 5, 1)], NOW);
        assert_eq!(index.len(), 1);
        assert!(index.query(&["github".into()]).is_empty());
        assert_eq!(index.query(&["new".into()]).len(), 1);
    }

    #[test]
    fn test_concurrent_queries_see_a_full_snapshot() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let index = Arc::new(sample_index());
        let stop = Arc::new(AtomicBool::new(false));

        let reader = {
            let index = Arc::clone(&index);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    // Either snapshot has github or is the rebuilt one with
                    // exactly one entry; a partial view would break both.
                    let n = index.len();
                    assert!(n == 3 || n == 1, "saw partial snapshot of {n} entries");
                }
            })
        };

        for _ in 0..100 {
            index.rebuild(&[entry("https://new.example.com", "New", 5, 1)], NOW);
            index.rebuild(
                &[
                    entry("https://github.com/rust-lang/cargo", "Cargo repository", 12, 4),
                    entry("https://docs.rs/serde", "serde - Rust docs", 8, 0),
                    entry("https://news.ycombinator.com", "Hacker News", 30, 2),
                ],
                NOW,
            );
        }
        stop.store(true, Ordering::Relaxed);
        reader.join().unwrap();
    }
}

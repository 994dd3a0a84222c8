//! Text tokenization and term matching.
//!
//! Everything the engine matches against (history URLs, page titles, open tab
//! titles) is broken into lowercase tokens here, and every typed term is
//! classified against those tokens. The `all_terms_match` AND-test is the
//! admission rule for the in-memory URL index.

/// How strongly a typed term matches a single token.
///
/// Variants are ordered weakest to strongest so `Ord` comparisons and `max()`
/// do the right thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TermMatch {
    None,
    Substring,
    Prefix,
    Exact,
}

impl TermMatch {
    /// True for any match stronger than `None`.
    pub fn is_match(self) -> bool {
        self != TermMatch::None
    }

    /// Match quality on a [0, 1] scale, used by the scoring model.
    pub fn quality(self) -> f64 {
        match self {
            TermMatch::Exact => 1.0,
            TermMatch::Prefix => 0.75,
            TermMatch::Substring => 0.5,
            TermMatch::None => 0.0,
        }
    }
}

/// Split free text (URLs, titles) into lowercase tokens on every
/// non-alphanumeric boundary.
///
/// `"https://GitHub.com/rust"` becomes `["https", "github", "com", "rust"]`.
/// Empty or whitespace-only input yields no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

/// Split user input into whitespace-delimited lowercase terms, preserving the
/// order the user typed them in.
pub fn tokenize_input(text: &str) -> Vec<String> {
    text.split_whitespace().map(|s| s.to_lowercase()).collect()
}

/// Classify how `term` matches `token`. Exact beats prefix beats substring.
pub fn match_term(term: &str, token: &str) -> TermMatch {
    if term.is_empty() || token.is_empty() {
        return TermMatch::None;
    }
    if token == term {
        TermMatch::Exact
    } else if token.starts_with(term) {
        TermMatch::Prefix
    } else if token.contains(term) {
        TermMatch::Substring
    } else {
        TermMatch::None
    }
}

/// Best match for `term` across a token collection, short-circuiting as soon
/// as an exact match is seen.
pub fn find_best_match(term: &str, tokens: &[String]) -> TermMatch {
    let mut best = TermMatch::None;
    for token in tokens {
        let m = match_term(term, token);
        if m == TermMatch::Exact {
            return TermMatch::Exact;
        }
        best = best.max(m);
    }
    best
}

/// AND-semantics admission test: every term must match at least one token.
///
/// An empty term list is vacuously true; callers decide whether an empty
/// query should reach this point at all.
pub fn all_terms_match(terms: &[String], tokens: &[String]) -> bool {
    terms
        .iter()
        .all(|term| find_best_match(term, tokens).is_match())
}

//! Input classification: decide whether raw omnibox text looks like a URL, a
//! search query, or a forced query before any provider runs.
//!
//! Classification is an ordered rule list; the first rule that fires wins.
//! Keyword-trigger classification (single ambiguous words bound to search
//! keywords) is an explicit extension point: such inputs stay `Unknown`
//! rather than being guessed at.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::input::InputType;

/// Explicit scheme prefix, e.g. `https://`, `ftp://`, `chrome-extension://`.
static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://").expect("scheme regex"));

/// `host:port` with an optional path, e.g. `localhost:8080/admin`.
static HOST_PORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.-]*:\d{1,5}(/\S*)?$").expect("host:port regex"));

/// Dotted-quad IPv4 literal with optional port and path.
static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})(:\d{1,5})?(/\S*)?$")
        .expect("ipv4 regex")
});

/// Fixed set of TLDs a bare single-token input is checked against.
static KNOWN_TLDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "com", "net", "org", "io", "dev", "app", "edu", "gov", "mil", "info", "biz", "xyz",
        "me", "tv", "ai", "co", "uk", "de", "fr", "jp", "cn", "ru", "br", "in", "au", "ca",
        "ch", "nl", "se", "no", "es", "it", "pl", "rs",
    ]
    .into_iter()
    .collect()
});

/// Classify trimmed input text into a coarse input type.
///
/// Total and pure: identical text always yields the identical type, and no
/// input is an error. Empty or whitespace-only text is `Unknown`.
pub fn classify(text: &str) -> InputType {
    let text = text.trim();
    if text.is_empty() {
        return InputType::Unknown;
    }

    if text.starts_with('?') {
        return InputType::ForcedQuery;
    }
    if SCHEME_RE.is_match(text) {
        return InputType::Url;
    }
    if HOST_PORT_RE.is_match(text) {
        return InputType::Url;
    }
    if is_ipv4_literal(text) {
        return InputType::Url;
    }
    if !text.contains(' ') && text.ends_with('/') {
        return InputType::Url;
    }
    if !text.contains(' ') && has_known_tld(text) {
        return InputType::Url;
    }
    if text.contains(' ') {
        return InputType::Query;
    }

    InputType::Unknown
}

fn is_ipv4_literal(text: &str) -> bool {
    let Some(caps) = IPV4_RE.captures(text) else {
        return false;
    };
    // The pattern admits 3-digit octets above 255; reject those here.
    (1..=4).all(|i| caps[i].parse::<u16>().map(|o| o <= 255).unwrap_or(false))
}

/// Single-token domain-like string whose suffix is a known TLD, e.g.
/// `github.com` or `docs.rs/serde`.
fn has_known_tld(text: &str) -> bool {
    let host = text.split('/').next().unwrap_or(text);
    if host.is_empty() || host.starts_with('.') || host.ends_with('.') {
        return false;
    }
    let Some((_, suffix)) = host.rsplit_once('.') else {
        return false;
    };
    KNOWN_TLDS.contains(suffix.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(classify(""), InputType::Unknown);
        assert_eq!(classify("   "), InputType::Unknown);
    }

    #[test]
    fn test_forced_query_prefix() {
        assert_eq!(classify("?rust tutorial"), InputType::ForcedQuery);
        assert_eq!(classify("?github.com"), InputType::ForcedQuery);
    }

    #[test]
    fn test_scheme_prefix() {
        assert_eq!(classify("https://example.com"), InputType::Url);
        assert_eq!(classify("HTTP://EXAMPLE.COM"), InputType::Url);
        assert_eq!(classify("chrome-extension://abcdef"), InputType::Url);
        assert_eq!(classify("ftp://files.example.com"), InputType::Url);
    }

    #[test]
    fn test_host_port() {
        assert_eq!(classify("localhost:8080"), InputType::Url);
        assert_eq!(classify("dev.internal:3000/admin"), InputType::Url);
    }

    #[test]
    fn test_ipv4_literal() {
        assert_eq!(classify("192.168.1.1"), InputType::Url);
        assert_eq!(classify("10.0.0.1:9090/metrics"), InputType::Url);
        // Octet out of range falls through to the TLD check, then Unknown.
        assert_eq!(classify("999.999.999.999"), InputType::Unknown);
    }

    #[test]
    fn test_trailing_slash() {
        assert_eq!(classify("intranet/"), InputType::Url);
        assert_eq!(classify("not a url/"), InputType::Query);
    }

    #[test]
    fn test_known_tld() {
        assert_eq!(classify("github.com"), InputType::Url);
        assert_eq!(classify("docs.rs/serde"), InputType::Url);
        assert_eq!(classify("example.unknowntld"), InputType::Unknown);
    }

    #[test]
    fn test_query_with_space() {
        assert_eq!(classify("rust borrow checker"), InputType::Query);
        assert_eq!(classify("github.com error codes"), InputType::Query);
    }

    #[test]
    fn test_single_word_stays_unknown() {
        assert_eq!(classify("rust"), InputType::Unknown);
        assert_eq!(classify("github"), InputType::Unknown);
    }

    #[test]
    fn test_pure_and_total() {
        for text in ["github.com", "?q", "hello world", "x", ""] {
            assert_eq!(classify(text), classify(text));
        }
    }
}

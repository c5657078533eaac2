//! Line-level domain extraction
//!
//! Blocklists come in two shapes: plain domain lists and hosts files. Both are
//! handled by a single pattern anchored at the start of each line, which skips an
//! optional `0.0.0.0` / `127.0.0.1` sink address and captures the hostname that follows.

use crate::domain::Domain;
use regex::Regex;
use std::sync::LazyLock;

static HOST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:0\.0\.0\.0|127\.0\.0\.1)?\s*([a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+)",
    )
    .expect("host line pattern is valid")
});

/// Extracts a normalized domain from a single line of a fetched list
///
/// Returns `None` for comments, blank lines, bare sink addresses, hostnames the
/// pattern could only match partially (an over-long label), and anything that fails
/// [`Domain::parse`].
///
/// # Examples
///
/// ```
/// use blockmerge::extract_domain;
///
/// assert_eq!(extract_domain("0.0.0.0 Ads.Example.com").unwrap().as_str(), "ads.example.com");
/// assert_eq!(extract_domain("tracker.example.net").unwrap().as_str(), "tracker.example.net");
/// assert!(extract_domain("# comment").is_none());
/// assert!(extract_domain("127.0.0.1 localhost").is_none());
/// ```
pub fn extract_domain(line: &str) -> Option<Domain> {
    let captures = HOST_LINE.captures(line)?;
    let host = captures.get(1)?;

    // A hostname character right after the capture means the match was truncated
    if let Some(next) = line[host.end()..].chars().next() {
        if next.is_ascii_alphanumeric() || next == '-' {
            return None;
        }
    }

    Domain::parse(host.as_str()).ok()
}

/// Extracts domains from every line of a list body, preserving line order
pub fn extract_domains(body: &str) -> Vec<Domain> {
    body.lines().filter_map(extract_domain).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(line: &str) -> Option<String> {
        extract_domain(line).map(Domain::into_string)
    }

    #[test]
    fn test_plain_domain() {
        assert_eq!(extracted("ads.example.com"), Some("ads.example.com".into()));
    }

    #[test]
    fn test_hosts_format() {
        assert_eq!(
            extracted("0.0.0.0 ads.example.com"),
            Some("ads.example.com".into())
        );
        assert_eq!(
            extracted("127.0.0.1\ttracker.example.net"),
            Some("tracker.example.net".into())
        );
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(extracted("0.0.0.0 ADS.Example.COM"), Some("ads.example.com".into()));
    }

    #[test]
    fn test_trailing_comment_ignored() {
        assert_eq!(
            extracted("0.0.0.0 ads.example.com # served by x"),
            Some("ads.example.com".into())
        );
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(extracted("   ads.example.com"), Some("ads.example.com".into()));
    }

    #[test]
    fn test_comment_and_blank_lines() {
        assert_eq!(extracted("# Title: some list"), None);
        assert_eq!(extracted("! adblock comment"), None);
        assert_eq!(extracted(""), None);
    }

    #[test]
    fn test_ip_artifacts_rejected() {
        assert_eq!(extracted("0.0.0.0"), None);
        assert_eq!(extracted("127.0.0.1 localhost"), None);
        assert_eq!(extracted("0.0.0.0 0.0.0.0"), None);
    }

    #[test]
    fn test_single_label_rejected() {
        assert_eq!(extracted("0.0.0.0 localhost"), None);
    }

    #[test]
    fn test_adblock_syntax_not_matched() {
        assert_eq!(extracted("||ads.example.com^"), None);
    }

    #[test]
    fn test_overlong_label_rejected() {
        let line = format!("ads.{}", "b".repeat(70));
        assert_eq!(extracted(&line), None);
    }

    #[test]
    fn test_url_path_is_cut() {
        assert_eq!(
            extracted("ads.example.com/banner.js"),
            Some("ads.example.com".into())
        );
    }

    #[test]
    fn test_extract_domains_preserves_order() {
        let body = "# list\nb.example.com\n0.0.0.0 a.example.com\n\nnot a domain\nc.example.org\n";
        let domains: Vec<String> = extract_domains(body)
            .into_iter()
            .map(Domain::into_string)
            .collect();
        assert_eq!(
            domains,
            vec!["b.example.com", "a.example.com", "c.example.org"]
        );
    }
}

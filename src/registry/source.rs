//! Source records and the directive line format
//!
//! In memory a source is a plain record. The `MASTER|` and `FAILx<n>|` prefixes only
//! exist in the persisted registry file and are handled by [`parse_directive`] and
//! [`Source::directive`].

use url::Url;

/// Prefix marking a master source
pub const MASTER_PREFIX: &str = "MASTER|";

/// Prefix introducing a fail counter (`FAILx<n>|`)
pub const FAIL_PREFIX: &str = "FAILx";

/// A remote blocklist source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// URL used for fetching, exactly as written in the registry
    pub url: String,

    /// Identity key: lowercase URL without trailing slashes
    pub key: String,

    /// Master sources are never removed automatically
    pub is_master: bool,

    /// Consecutive failed fetches since the last success
    pub fail_count: u32,
}

impl Source {
    /// Creates a plain source with no flags
    pub fn new(url: &str) -> Self {
        let url = url.trim().to_string();
        let key = source_key(&url);
        Self {
            url,
            key,
            is_master: false,
            fail_count: 0,
        }
    }

    /// Creates a master source
    pub fn master(url: &str) -> Self {
        Self {
            is_master: true,
            ..Self::new(url)
        }
    }

    /// Sets the fail counter
    pub fn with_fail_count(mut self, fail_count: u32) -> Self {
        self.fail_count = fail_count;
        self
    }

    /// Returns true if the source URL contains any of the trust keywords
    ///
    /// Keywords are expected in lowercase; matching is done against the key.
    pub fn is_protected(&self, keywords: &[String]) -> bool {
        keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && self.key.contains(keyword.as_str()))
    }

    /// Short name for console output: the last path segment, at most 50 chars
    pub fn display_name(&self) -> &str {
        let trimmed = self.url.trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
        match name.char_indices().nth(50) {
            Some((cut, _)) => &name[..cut],
            None => name,
        }
    }

    /// Serializes the source as a registry directive line
    ///
    /// ```
    /// use blockmerge::Source;
    ///
    /// assert_eq!(Source::new("https://x.test/list").directive(), "https://x.test/list");
    /// assert_eq!(
    ///     Source::new("https://x.test/list").with_fail_count(2).directive(),
    ///     "FAILx2|https://x.test/list"
    /// );
    /// assert_eq!(Source::master("https://x.test/list").directive(), "MASTER|https://x.test/list");
    /// ```
    pub fn directive(&self) -> String {
        let mut line = String::new();
        if self.is_master {
            line.push_str(MASTER_PREFIX);
        }
        if self.fail_count > 0 {
            line.push_str(&format!("{}{}|", FAIL_PREFIX, self.fail_count));
        }
        line.push_str(&self.url);
        line
    }

    /// Ordering key of the registry: masters first, then alphabetical by key
    pub fn sort_key(&self) -> (bool, &str) {
        (!self.is_master, self.key.as_str())
    }
}

/// Computes the identity key of a URL
pub fn source_key(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

/// Parses one registry line into a source
///
/// Returns `None` for blank lines and comments. Prefixes compose in any order; when
/// several fail counters are present the largest one wins.
///
/// A URL that is not an absolute `http`/`https` URL is kept with a warning. Its fetch
/// fails, so the reliability rules decide its fate like any other offline source.
pub fn parse_directive(line: &str) -> Option<Source> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut rest = line;
    let mut is_master = false;
    let mut fail_count = 0u32;

    loop {
        if let Some(after) = rest.strip_prefix(MASTER_PREFIX) {
            is_master = true;
            rest = after;
        } else if let Some((count, after)) = strip_fail_prefix(rest) {
            fail_count = fail_count.max(count);
            rest = after;
        } else {
            break;
        }
    }

    let rest = rest.trim();
    match Url::parse(rest) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            tracing::warn!("Source has unsupported scheme '{}': {}", url.scheme(), rest);
        }
        Err(e) => {
            tracing::warn!("Source URL '{}' cannot be fetched: {}", rest, e);
        }
    }

    Some(Source {
        is_master,
        fail_count,
        ..Source::new(rest)
    })
}

/// Strips a leading `FAILx<digits>|`, returning the count and the remainder
fn strip_fail_prefix(s: &str) -> Option<(u32, &str)> {
    let after = s.strip_prefix(FAIL_PREFIX)?;
    let digits_end = after
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after.len());
    if digits_end == 0 {
        return None;
    }
    let remainder = after[digits_end..].strip_prefix('|')?;
    let count = after[..digits_end].parse::<u32>().unwrap_or(u32::MAX);
    Some((count, remainder))
}

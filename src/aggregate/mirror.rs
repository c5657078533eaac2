//! Run-scoped mirror detection
//!
//! Many lists are republished verbatim under several URLs. The mirror index
//! fingerprints every fetched body and remembers which non-master source produced
//! it first. A copy of a master's body is not a mirror; it is ingested normally.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// SHA-256 digest of a response body
pub type Fingerprint = [u8; 32];

/// Computes the fingerprint of a raw body
pub fn fingerprint(body: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hasher.finalize().into()
}

/// Producers of one body
#[derive(Debug, Default, Clone)]
struct Producers {
    /// First non-master source that served the body
    first_plain: Option<String>,
}

/// Maps body fingerprints to the first non-master URL that produced them
#[derive(Debug, Default, Clone)]
pub struct MirrorIndex {
    seen: HashMap<Fingerprint, Producers>,
}

impl MirrorIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `body` for `url`, or returns the non-master URL that already produced it
    ///
    /// Bodies served by masters are recorded without claiming them, so a later
    /// non-master copy is not reported. A source fetched twice under the same URL is
    /// not its own mirror.
    ///
    /// ```
    /// use blockmerge::MirrorIndex;
    ///
    /// let mut mirrors = MirrorIndex::new();
    /// assert_eq!(mirrors.check_and_record(b"ads.test\n", "https://a.test/list", false), None);
    /// assert_eq!(
    ///     mirrors.check_and_record(b"ads.test\n", "https://b.test/list", false),
    ///     Some("https://a.test/list".to_string())
    /// );
    /// ```
    pub fn check_and_record(
        &mut self,
        body: &[u8],
        url: &str,
        is_master: bool,
    ) -> Option<String> {
        let digest = fingerprint(body);
        let producers = self.seen.entry(digest).or_default();

        match &producers.first_plain {
            Some(first) if first != url => {
                tracing::debug!(
                    "Body {} of {} already seen at {}",
                    &hex::encode(digest)[..12],
                    url,
                    first
                );
                Some(first.clone())
            }
            Some(_) => None,
            None => {
                if !is_master {
                    producers.first_plain = Some(url.to_string());
                }
                None
            }
        }
    }

    /// Returns the number of distinct bodies seen
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

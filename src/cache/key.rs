//! Canonical cache keys.
//!
//! Two URLs share a cache entry exactly when their keys are equal. The key is
//! the serialized [`Url`] with the fragment removed: parsing has already
//! lowercased the scheme and host, dropped default ports and turned an empty
//! path into `/`. Path and query are compared byte-for-byte, so
//! `?a=1&b=2` and `?b=2&a=1` are different resources.

use std::fmt;

use url::Url;

/// The normalized identity of a cached resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Url> for CacheKey {
    fn from(url: &Url) -> Self {
        if url.fragment().is_none() {
            return Self(url.as_str().to_owned());
        }
        let mut url = url.clone();
        url.set_fragment(None);
        Self(url.into())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> CacheKey {
        CacheKey::from(&Url::parse(s).unwrap())
    }

    #[test]
    fn scheme_and_host_are_case_folded() {
        assert_eq!(key("HTTPS://API.Example.COM/t"), key("https://api.example.com/t"));
    }

    #[test]
    fn default_port_is_dropped() {
        assert_eq!(key("https://x:443/t"), key("https://x/t"));
        assert_ne!(key("https://x:8443/t"), key("https://x/t"));
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(key("https://x"), key("https://x/"));
    }

    #[test]
    fn fragment_is_ignored() {
        assert_eq!(key("https://x/t#top"), key("https://x/t"));
        assert_eq!(key("https://x/t#top").as_str(), "https://x/t");
    }

    #[test]
    fn path_is_case_sensitive() {
        assert_ne!(key("https://x/Ticket"), key("https://x/ticket"));
    }

    #[test]
    fn query_order_matters() {
        assert_ne!(key("https://x/t?a=1&b=2"), key("https://x/t?b=2&a=1"));
        assert_ne!(key("https://x/t?a=1"), key("https://x/t"));
    }
}

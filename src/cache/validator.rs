use std::fmt;

/// An opaque, server-issued validator (the value of an `ETag` header).
///
/// The value is kept exactly as received, including any `W/` weak prefix and
/// surrounding quotes; the client never interprets it, it only echoes it
/// back in `If-None-Match`.
///
/// # Examples
///
/// ```
/// use etagcache::cache::Validator;
///
/// assert_eq!(Validator::parse("W/\"42\"").unwrap().as_str(), "W/\"42\"");
/// assert!(Validator::parse("").is_none());
/// assert!(Validator::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Validator(String);

impl Validator {
    /// Returns `None` for an empty or whitespace-only value, which counts as
    /// "no validator".
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(value.to_owned()))
    }

    /// Returns the validator exactly as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the validator, returning the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Validator {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

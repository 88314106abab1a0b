//! In-process validator store.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;
use url::Url;

use super::{CacheKey, Validator, ValidatorStore};

/// A [`ValidatorStore`] backed by a `HashMap` behind a read/write lock.
///
/// Every operation holds the lock for exactly one map access, so readers only
/// contend with writers for the duration of a single lookup or insert. The
/// map is unbounded: it grows by one entry per distinct URL that ever
/// returned a validator.
///
/// Construct one per client and share it with [`Arc`](std::sync::Arc);
/// independent instances never see each other's entries.
#[derive(Debug, Default)]
pub struct MemoryValidatorStore {
    entries: RwLock<HashMap<CacheKey, Validator>>,
}

impl MemoryValidatorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of URLs with a cached validator.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no validator has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drops every entry. Only the owner of the store should do this, e.g.
    /// when the signed-in account changes.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl ValidatorStore for MemoryValidatorStore {
    fn get(&self, url: &Url) -> Option<String> {
        let key = CacheKey::from(url);
        let found = self
            .entries
            .read()
            .get(&key)
            .map(|validator| validator.as_str().to_owned());
        trace!(key = %key, hit = found.is_some(), "validator lookup");
        found
    }

    fn put(&self, url: &Url, validator: &str) {
        let Some(validator) = Validator::parse(validator) else {
            trace!(url = %url, "ignoring empty validator");
            return;
        };
        let key = CacheKey::from(url);
        trace!(key = %key, etag = %validator, "storing validator");
        self.entries.write().insert(key, validator);
    }
}

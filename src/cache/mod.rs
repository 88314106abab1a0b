//! Validator cache — the last-known `ETag` for every URL the client has fetched.
//!
//! ## Core types
//!
//! - [`ValidatorStore`] — the capability every cache backend implements: a
//!   thread-safe `get`/`put` keyed by URL.
//! - [`MemoryValidatorStore`] — the in-process backend, a lock-guarded map.
//! - [`CacheKey`] — the canonical form a URL is reduced to before lookup.
//! - [`Validator`] — a non-empty, opaque validator string.
//!
//! Entries live for as long as the store does. A URL moves from *absent* to
//! *cached* on the first response that carries a validator, and every later
//! validator for the same URL overwrites the previous one. There is no path
//! back to *absent*.

use std::sync::Arc;

use url::Url;

mod key;
mod memory;
mod validator;

pub use key::CacheKey;
pub use memory::MemoryValidatorStore;
pub use validator::Validator;

/// A shared handle to a validator store, as held by the annotator, the
/// response validator and the client.
pub type SharedValidatorStore = Arc<dyn ValidatorStore>;

/// Thread-safe mapping from resource URL to its last-known validator.
///
/// # Contract
///
/// - [`put`](Self::put) with an empty (or whitespace-only) validator is a no-op.
/// - A completed `put` is visible to every later [`get`](Self::get) on any thread.
/// - Concurrent `put`s for one URL resolve last-write-wins; a reader never
///   observes a partially written value.
/// - Neither operation blocks on I/O.
///
/// # Examples
///
/// ```
/// use etagcache::cache::{MemoryValidatorStore, ValidatorStore};
/// use url::Url;
///
/// let store = MemoryValidatorStore::new();
/// let url = Url::parse("https://x/ticket").unwrap();
///
/// assert_eq!(store.get(&url), None);
/// store.put(&url, "\"v1\"");
/// assert_eq!(store.get(&url).as_deref(), Some("\"v1\""));
/// ```
pub trait ValidatorStore: Send + Sync {
    /// Returns the most recently stored validator for `url`, if any.
    fn get(&self, url: &Url) -> Option<String>;

    /// Stores `validator` for `url`, replacing any previous value.
    fn put(&self, url: &Url, validator: &str);
}

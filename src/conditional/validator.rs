use tracing::debug;
use url::Url;

use crate::cache::SharedValidatorStore;
use crate::http::{Response, StatusCode};

/// Returns `true` exactly when `status` is `304 Not Modified`.
pub fn is_unmodified(status: u16) -> bool {
    StatusCode::try_from(status).is_ok_and(StatusCode::is_not_modified)
}

/// Records validators from completed responses and reports whether the
/// client's cached body is still current.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use etagcache::cache::{MemoryValidatorStore, ValidatorStore};
/// use etagcache::conditional::ResponseValidator;
/// use url::Url;
///
/// let store = Arc::new(MemoryValidatorStore::new());
/// let validator = ResponseValidator::new(store.clone());
/// let url = Url::parse("https://x/ticket").unwrap();
///
/// assert!(!validator.validate(&url, 200, Some("\"v1\"")));
/// assert!(validator.validate(&url, 304, None));
/// assert_eq!(store.get(&url).as_deref(), Some("\"v1\""));
/// ```
#[derive(Clone)]
pub struct ResponseValidator {
    store: SharedValidatorStore,
}

impl ResponseValidator {
    /// Creates a validator that records into `store`.
    pub fn new(store: SharedValidatorStore) -> Self {
        Self { store }
    }

    /// Stores `etag` for `url` (whatever the status) and returns whether the
    /// response is `304 Not Modified`.
    ///
    /// The result depends on `status` alone. Validators are never compared
    /// here; the server did that when it evaluated `If-None-Match`. An empty
    /// `etag` counts as absent and is not stored.
    pub fn validate(&self, url: &Url, status: u16, etag: Option<&str>) -> bool {
        if let Some(etag) = etag {
            self.store.put(url, etag);
        }
        let unmodified = is_unmodified(status);
        debug!(url = %url, status, unmodified, "validated response");
        unmodified
    }

    /// Like [`validate`](Self::validate), reading the URL, status and `ETag`
    /// header from `response`.
    pub fn validate_response(&self, response: &Response) -> bool {
        self.validate(response.url(), response.status_code(), response.etag())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::{MemoryValidatorStore, ValidatorStore};

    fn setup() -> (Arc<MemoryValidatorStore>, ResponseValidator, Url) {
        let store = Arc::new(MemoryValidatorStore::new());
        let validator = ResponseValidator::new(store.clone());
        (store, validator, Url::parse("https://x/ticket").unwrap())
    }

    #[test]
    fn only_304_is_unmodified() {
        let (_, validator, url) = setup();
        for status in [200, 204, 304, 404, 500] {
            assert_eq!(validator.validate(&url, status, None), status == 304);
        }
    }

    #[test]
    fn result_ignores_validator_contents() {
        let (store, validator, url) = setup();
        store.put(&url, "v1");
        assert!(!validator.validate(&url, 200, Some("v1")));
        assert!(validator.validate(&url, 304, Some("different")));
    }

    #[test]
    fn stores_validator_on_errors_too() {
        let (store, validator, url) = setup();
        assert!(!validator.validate(&url, 500, Some("e1")));
        assert_eq!(store.get(&url).as_deref(), Some("e1"));
    }

    #[test]
    fn empty_etag_not_stored() {
        let (store, validator, url) = setup();
        assert!(!validator.validate(&url, 200, Some("")));
        assert!(store.is_empty());
    }

    #[test]
    fn validate_response_reads_etag_header() {
        let (store, validator, url) = setup();
        let response = Response::new(url.clone(), 200).header("etag", "\"abc\"");
        assert!(!validator.validate_response(&response));
        assert_eq!(store.get(&url).as_deref(), Some("\"abc\""));

        let response = Response::new(url.clone(), 304);
        assert!(validator.validate_response(&response));
        assert_eq!(store.get(&url).as_deref(), Some("\"abc\""));
    }
}

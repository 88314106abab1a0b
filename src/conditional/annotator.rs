use tracing::trace;
use url::Url;

use crate::cache::SharedValidatorStore;
use crate::http::Request;
use crate::http::headers::IF_NONE_MATCH;

/// Adds `If-None-Match` to outgoing requests whose URL has a cached validator.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use etagcache::cache::{MemoryValidatorStore, ValidatorStore};
/// use etagcache::conditional::ConditionalRequestAnnotator;
/// use etagcache::http::Request;
/// use url::Url;
///
/// let store = Arc::new(MemoryValidatorStore::new());
/// let url = Url::parse("https://x/ticket").unwrap();
/// store.put(&url, "\"v1\"");
///
/// let annotator = ConditionalRequestAnnotator::new(store);
/// let mut request = Request::get(url.clone());
/// annotator.annotate(&mut request, &url);
///
/// assert_eq!(request.headers().get("If-None-Match"), Some("\"v1\""));
/// ```
#[derive(Clone)]
pub struct ConditionalRequestAnnotator {
    store: SharedValidatorStore,
}

impl ConditionalRequestAnnotator {
    /// Creates an annotator that reads validators from `store`.
    pub fn new(store: SharedValidatorStore) -> Self {
        Self { store }
    }

    /// Sets `If-None-Match` on `request` to the validator cached for `url`.
    ///
    /// `url` must be the request's own target. Any existing `If-None-Match`
    /// entries are replaced. When nothing is cached the headers are left
    /// untouched. Repeated calls with no intervening store update produce the
    /// same header.
    pub fn annotate(&self, request: &mut Request, url: &Url) {
        match self.store.get(url) {
            Some(validator) => {
                trace!(url = %url, etag = %validator, "adding If-None-Match");
                request.headers_mut().set(IF_NONE_MATCH, validator);
            }
            None => trace!(url = %url, "no cached validator"),
        }
    }

    /// Like [`annotate`](Self::annotate), using the request's own URL.
    pub fn annotate_request(&self, request: &mut Request) {
        let url = request.url().clone();
        self.annotate(request, &url);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::{MemoryValidatorStore, ValidatorStore};

    fn setup() -> (Arc<MemoryValidatorStore>, ConditionalRequestAnnotator, Url) {
        let store = Arc::new(MemoryValidatorStore::new());
        let annotator = ConditionalRequestAnnotator::new(store.clone());
        (store, annotator, Url::parse("https://x/ticket").unwrap())
    }

    #[test]
    fn unseen_url_leaves_headers_alone() {
        let (_, annotator, url) = setup();
        let mut request = Request::get(url.clone()).header("Accept", "*/*");
        annotator.annotate(&mut request, &url);
        assert!(!request.headers().contains(IF_NONE_MATCH));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn replaces_existing_precondition() {
        let (store, annotator, url) = setup();
        store.put(&url, "\"fresh\"");
        let mut request = Request::get(url.clone())
            .header("if-none-match", "\"stale\"")
            .header("If-None-Match", "\"older\"");
        annotator.annotate(&mut request, &url);
        let values: Vec<_> = request.headers().get_all(IF_NONE_MATCH).collect();
        assert_eq!(values, vec!["\"fresh\""]);
    }

    #[test]
    fn idempotent() {
        let (store, annotator, url) = setup();
        store.put(&url, "v1");
        let mut request = Request::get(url.clone());
        annotator.annotate(&mut request, &url);
        annotator.annotate(&mut request, &url);
        let values: Vec<_> = request.headers().get_all(IF_NONE_MATCH).collect();
        assert_eq!(values, vec!["v1"]);
    }

    #[test]
    fn caller_supplied_header_kept_without_cache_entry() {
        let (_, annotator, url) = setup();
        let mut request = Request::get(url.clone()).header(IF_NONE_MATCH, "\"mine\"");
        annotator.annotate(&mut request, &url);
        assert_eq!(request.headers().get(IF_NONE_MATCH), Some("\"mine\""));
    }

    #[test]
    fn annotate_request_uses_target() {
        let (store, annotator, url) = setup();
        store.put(&url, "v1");
        let mut request = Request::get(url);
        annotator.annotate_request(&mut request);
        assert_eq!(request.headers().get(IF_NONE_MATCH), Some("v1"));
    }
}

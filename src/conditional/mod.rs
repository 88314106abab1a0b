//! Conditional requests — attach `If-None-Match` on the way out, record
//! `ETag` and detect `304 Not Modified` on the way back.
//!
//! The two halves share one [`ValidatorStore`]:
//!
//! ```text
//! Request ──► ConditionalRequestAnnotator ──► transport ──► ResponseValidator ──► unmodified?
//!                     │  get(url)                               │  put(url, etag)
//!                     └──────────────── ValidatorStore ◄────────┘
//! ```
//!
//! Neither half can fail. A missing validator simply means the request goes
//! out unconditional, and a response without `ETag` leaves the store as it was.

mod annotator;
mod validator;

pub use annotator::ConditionalRequestAnnotator;
pub use validator::{ResponseValidator, is_unmodified};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use url::Url;

    use super::*;
    use crate::cache::{MemoryValidatorStore, SharedValidatorStore, ValidatorStore};
    use crate::http::Request;
    use crate::http::headers::IF_NONE_MATCH;

    fn pair() -> (
        SharedValidatorStore,
        ConditionalRequestAnnotator,
        ResponseValidator,
    ) {
        let store: SharedValidatorStore = Arc::new(MemoryValidatorStore::new());
        let annotator = ConditionalRequestAnnotator::new(Arc::clone(&store));
        let validator = ResponseValidator::new(Arc::clone(&store));
        (store, annotator, validator)
    }

    #[test]
    fn first_fetch_then_revalidate() {
        let (store, annotator, validator) = pair();
        let url = Url::parse("https://x/ticket").unwrap();

        // Empty store: the request goes out unconditional.
        let mut request = Request::get(url.clone());
        annotator.annotate(&mut request, &url);
        assert!(!request.headers().contains(IF_NONE_MATCH));

        // 200 with a validator: stored, body is fresh.
        assert!(!validator.validate(&url, 200, Some("v1")));
        assert_eq!(store.get(&url).as_deref(), Some("v1"));

        // Next request carries the validator.
        let mut request = Request::get(url.clone());
        annotator.annotate(&mut request, &url);
        assert_eq!(request.headers().get(IF_NONE_MATCH), Some("v1"));

        // 304 without a validator: store untouched, body is redundant.
        assert!(validator.validate(&url, 304, None));
        assert_eq!(store.get(&url).as_deref(), Some("v1"));
    }

    #[test]
    fn not_modified_refreshes_validator() {
        let (store, _, validator) = pair();
        let url = Url::parse("https://x/ticket").unwrap();
        store.put(&url, "v1");
        assert!(validator.validate(&url, 304, Some("v2")));
        assert_eq!(store.get(&url).as_deref(), Some("v2"));
    }
}

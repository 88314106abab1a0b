//! # etagcache
//!
//! Conditional HTTP requests for clients: remember the `ETag` each URL last
//! returned, send it back as `If-None-Match`, and tell the caller when the
//! server answers `304 Not Modified`.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use etagcache::cache::{MemoryValidatorStore, SharedValidatorStore};
//! use etagcache::conditional::{ConditionalRequestAnnotator, ResponseValidator};
//! use etagcache::http::Request;
//! use url::Url;
//!
//! let store: SharedValidatorStore = Arc::new(MemoryValidatorStore::new());
//! let annotator = ConditionalRequestAnnotator::new(store.clone());
//! let validator = ResponseValidator::new(store);
//!
//! let url = Url::parse("https://x/ticket").unwrap();
//!
//! // First response carries a validator.
//! assert!(!validator.validate(&url, 200, Some("\"v1\"")));
//!
//! // The next request for the same URL becomes conditional.
//! let mut request = Request::get(url.clone());
//! annotator.annotate(&mut request, &url);
//! assert_eq!(request.headers().get("If-None-Match"), Some("\"v1\""));
//!
//! // 304: the body the caller already has is still current.
//! assert!(validator.validate(&url, 304, None));
//! ```

// ── Conditional-request core ──────────────────────────────────────────────────
pub mod cache;
pub mod conditional;

// ── Client plumbing ──────────────────────────────────────────────────────────
pub mod client;
pub mod http;
pub mod transport;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cache::{MemoryValidatorStore, SharedValidatorStore, ValidatorStore};
pub use client::{ConditionalClient, Fetched};
pub use conditional::{ConditionalRequestAnnotator, ResponseValidator};
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use transport::{TcpTransport, Transport, TransportError};

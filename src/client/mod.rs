//! Conditional HTTP client — annotate, send, validate.
//!
//! [`ConditionalClient`] wires a [`ConditionalRequestAnnotator`] and a
//! [`ResponseValidator`] around any [`Transport`], all sharing one
//! [`ValidatorStore`](crate::cache::ValidatorStore). Each
//! [`fetch`](ConditionalClient::fetch) reports whether the server confirmed
//! the caller's copy of the body is still current; keeping that body around
//! is the caller's job.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{MemoryValidatorStore, SharedValidatorStore};
use crate::conditional::{ConditionalRequestAnnotator, ResponseValidator};
use crate::http::{Request, Response};
use crate::transport::{Transport, TransportError};

/// The outcome of a conditional fetch.
#[derive(Debug)]
pub struct Fetched {
    response: Response,
    unmodified: bool,
}

impl Fetched {
    /// `true` when the server answered `304 Not Modified`: reuse the body
    /// cached from an earlier fetch instead of this response's (empty) body.
    pub fn is_unmodified(&self) -> bool {
        self.unmodified
    }

    /// Returns the response as received.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Consumes the outcome, returning the response.
    pub fn into_response(self) -> Response {
        self.response
    }
}

/// An HTTP client that makes every request conditional on the last
/// validator seen for its URL.
///
/// `ConditionalClient` is `Send + Sync` when its transport is, and holds no
/// lock across an `.await`, so one instance can serve many concurrent
/// fetches from different tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use etagcache::client::ConditionalClient;
/// use etagcache::http::Request;
/// use etagcache::transport::TcpTransport;
/// use url::Url;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ConditionalClient::with_memory_store(TcpTransport::default());
///     let url = Url::parse("http://127.0.0.1:8080/tickets/1")?;
///
///     let first = client.fetch(Request::get(url.clone())).await?;
///     let again = client.fetch(Request::get(url)).await?;
///     if again.is_unmodified() {
///         println!("reuse {} cached bytes", first.response().body().len());
///     }
///     Ok(())
/// }
/// ```
pub struct ConditionalClient<T> {
    transport: T,
    store: SharedValidatorStore,
    annotator: ConditionalRequestAnnotator,
    validator: ResponseValidator,
}

impl<T: Transport> ConditionalClient<T> {
    /// Creates a client that reads and records validators in `store`.
    pub fn new(transport: T, store: SharedValidatorStore) -> Self {
        Self {
            transport,
            annotator: ConditionalRequestAnnotator::new(Arc::clone(&store)),
            validator: ResponseValidator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Creates a client with its own empty [`MemoryValidatorStore`].
    pub fn with_memory_store(transport: T) -> Self {
        Self::new(transport, Arc::new(MemoryValidatorStore::new()))
    }

    /// Returns a handle to the validator store shared by this client.
    pub fn store(&self) -> &SharedValidatorStore {
        &self.store
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `request` with `If-None-Match` set from the store, records the
    /// response's `ETag`, and reports whether it was `304 Not Modified`.
    ///
    /// Only safe methods (`GET`, `HEAD`, `OPTIONS`, `TRACE`) are annotated; on
    /// any other method `If-None-Match` is a write precondition. Responses to
    /// every method have their `ETag` recorded.
    ///
    /// # Errors
    ///
    /// Only transport failures are returned; the conditional steps never fail.
    pub async fn fetch(&self, mut request: Request) -> Result<Fetched, TransportError> {
        if request.method().is_safe() {
            self.annotator.annotate_request(&mut request);
        }
        let response = self.transport.send(request).await?;
        let unmodified = self.validator.validate_response(&response);
        debug!(url = %response.url(), unmodified, "fetch complete");
        Ok(Fetched {
            response,
            unmodified,
        })
    }
}

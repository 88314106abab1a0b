//! Transports — the collaborator that actually moves a [`Request`] over the
//! network and hands back a [`Response`].
//!
//! The conditional-request core never performs I/O itself; it only needs
//! something that implements [`Transport`]. This module ships:
//!
//! - [`TcpTransport`] — a minimal plain-HTTP/1.1 transport over Tokio, one
//!   connection per request.
//! - [`LoggingTransport`] — a decorator that logs method, URL, status and
//!   elapsed time for every exchange.
//! - [`TransportConfig`] — size limits and the timeout used by [`TcpTransport`].
//!
//! TLS, pooling and retries belong to a full HTTP client; wrap one in a
//! [`Transport`] impl to use it with [`ConditionalClient`](crate::client::ConditionalClient).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::http::{Request, Response, ResponseError};

mod config;
mod logging;
mod tcp;

pub use config::TransportConfig;
pub use logging::LoggingTransport;
pub use tcp::TcpTransport;

/// A pinned, boxed, `Send` future resolving to a transport result.
pub type SendFuture = Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send>>;

/// Errors produced while sending a request or receiving its response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported URL scheme {scheme:?}; only plain http is supported")]
    UnsupportedScheme { scheme: String },

    #[error("URL has no host: {url}")]
    MissingHost { url: String },

    #[error("invalid response: {0}")]
    Response(#[from] ResponseError),

    #[error("response exceeds maximum allowed size of {max_bytes} bytes")]
    ResponseTooLarge { max_bytes: usize },

    #[error("connection closed before the response was complete")]
    Truncated,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Sends a request and resolves to the completed response.
///
/// # Contract
///
/// - Implementations **must** be `Send + Sync`; a client is shared across
///   Tokio tasks and may have many requests in flight.
/// - The returned future **must** be `Send + 'static`, so implementations
///   clone whatever state they need into it rather than borrowing `self`.
/// - The [`Response`] must carry the URL of the request it answers.
///
/// # Examples
///
/// ```rust
/// use etagcache::http::{Request, Response};
/// use etagcache::transport::{SendFuture, Transport};
///
/// /// Answers every request with `304 Not Modified`.
/// struct AlwaysNotModified;
///
/// impl Transport for AlwaysNotModified {
///     fn send(&self, request: Request) -> SendFuture {
///         Box::pin(async move { Ok(Response::new(request.url().clone(), 304)) })
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Dispatches `request` and resolves to its response.
    fn send(&self, request: Request) -> SendFuture;
}

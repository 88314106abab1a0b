use tokio::time::Instant;

use super::{SendFuture, Transport};
use crate::http::{Request, StatusCode};

/// Transport decorator that logs each exchange's method, URL, status, and duration.
///
/// Emits a single `tracing::info!` line once the inner transport completes,
/// in the format:
///
/// ```text
/// METHOD url - STATUS REASON (duration)
/// ```
///
/// Failures are logged at `warn` with the error and passed through unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use etagcache::transport::{LoggingTransport, TcpTransport};
///
/// let transport = LoggingTransport::new(TcpTransport::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T> LoggingTransport<T> {
    /// Wraps `inner`, logging every exchange it performs.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwraps the decorator.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport> Transport for LoggingTransport<T> {
    fn send(&self, request: Request) -> SendFuture {
        let method = request.method().as_str().to_owned();
        let url = request.url().to_string();
        let pending = self.inner.send(request);

        Box::pin(async move {
            let start = Instant::now();
            let result = pending.await;
            let duration = start.elapsed();

            match &result {
                Ok(response) => {
                    let reason = response.status().map_or("", StatusCode::canonical_reason);
                    tracing::info!(
                        "{} {} - {} {} ({:?})",
                        method,
                        url,
                        response.status_code(),
                        reason,
                        duration
                    )
                }
                Err(e) => tracing::warn!(error = %e, "{} {} - failed ({:?})", method, url, duration),
            }

            result
        })
    }
}

//! Plain HTTP/1.1 over a fresh Tokio `TcpStream` per request.

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use super::{SendFuture, Transport, TransportConfig, TransportError};
use crate::http::{Method, Request, Response, ResponseError};

/// A [`Transport`] that speaks HTTP/1.1 over plain TCP.
///
/// Each request opens its own connection and sends `Connection: close`, so
/// a response is complete once its framing is satisfied or the server hangs
/// up. Only `http://` URLs are accepted.
///
/// # Examples
///
/// ```rust,no_run
/// use etagcache::http::Request;
/// use etagcache::transport::{TcpTransport, Transport};
/// use url::Url;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let transport = TcpTransport::default();
///     let url = Url::parse("http://127.0.0.1:8080/tickets/1")?;
///     let response = transport.send(Request::get(url)).await?;
///     println!("{} {:?}", response.status_code(), response.etag());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport {
    config: TransportConfig,
}

impl TcpTransport {
    /// Creates a transport using `config` for every exchange.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Returns the config this transport was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Transport for TcpTransport {
    fn send(&self, request: Request) -> SendFuture {
        let config = self.config;
        Box::pin(async move {
            match tokio::time::timeout(config.timeout, round_trip(config, request)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(config.timeout)),
            }
        })
    }
}

/// Connects, writes the request, and reads until one final response has been
/// parsed. Interim `1xx` responses are skipped.
async fn round_trip(config: TransportConfig, request: Request) -> Result<Response, TransportError> {
    let url = request.url().clone();
    if url.scheme() != "http" {
        return Err(TransportError::UnsupportedScheme {
            scheme: url.scheme().to_owned(),
        });
    }
    let host = url.host_str().ok_or_else(|| TransportError::MissingHost {
        url: url.to_string(),
    })?;
    let port = url.port_or_known_default().unwrap_or(80);
    let addr = format!("{host}:{port}");

    let mut stream = TcpStream::connect(&addr)
        .await
        .map_err(|e| TransportError::Connect {
            addr: addr.clone(),
            source: e,
        })?;
    debug!(addr = %addr, method = %request.method(), target = %request.target(), "sending request");

    // A reply to HEAD ends with its headers whatever its framing headers say.
    let head_only = request.method() == &Method::Head;

    stream.write_all(&request.to_bytes()).await?;
    stream.flush().await?;

    let mut buf = BytesMut::with_capacity(config.initial_buf_size);

    loop {
        let bytes_read = stream.read_buf(&mut buf).await?;

        if bytes_read == 0 {
            debug!(addr = %addr, "connection closed by peer");
            let parsed = if head_only {
                Response::parse_head(url, &buf)
            } else {
                Response::parse_at_eof(url, &buf)
            };
            return match parsed {
                Ok((response, _)) => Ok(response),
                Err(ResponseError::Incomplete) => {
                    warn!(addr = %addr, buffered = buf.len(), "response truncated");
                    Err(TransportError::Truncated)
                }
                Err(e) => Err(e.into()),
            };
        }

        // Guard against excessively large responses.
        if buf.len() > config.max_response_size {
            warn!(addr = %addr, max_bytes = config.max_response_size, "response too large");
            return Err(TransportError::ResponseTooLarge {
                max_bytes: config.max_response_size,
            });
        }

        let parsed = if head_only {
            Response::parse_head(url.clone(), &buf)
        } else {
            Response::parse(url.clone(), &buf)
        };
        match parsed {
            Ok((response, consumed)) if is_interim(response.status_code()) => {
                debug!(addr = %addr, status = response.status_code(), "skipping interim response");
                let _ = buf.split_to(consumed);
            }
            Ok((response, _)) => return Ok(response),
            // Head or body not yet fully received; read more data.
            Err(ResponseError::Incomplete) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_interim(status: u16) -> bool {
    (100..200).contains(&status) && status != 101
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn interim_statuses() {
        assert!(is_interim(100));
        assert!(is_interim(103));
        assert!(!is_interim(101));
        assert!(!is_interim(200));
        assert!(!is_interim(304));
    }

    #[tokio::test]
    async fn rejects_https() {
        let transport = TcpTransport::default();
        let request = Request::get(Url::parse("https://x/ticket").unwrap());
        assert!(matches!(
            transport.send(request).await,
            Err(TransportError::UnsupportedScheme { scheme }) if scheme == "https"
        ));
    }
}

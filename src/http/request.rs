//! Outgoing HTTP/1.1 request descriptor.
//!
//! A [`Request`] is what the caller hands to a [`Transport`](crate::transport::Transport):
//! method, absolute target URL, header collection, and an optional body. The
//! conditional-request annotator mutates its headers in place before dispatch.

use bytes::{BufMut, Bytes, BytesMut};
use url::Url;

use super::headers::{CONNECTION, CONTENT_LENGTH, HOST};
use super::{Headers, Method};

/// An outgoing HTTP request, ready to be annotated and serialized.
///
/// # Examples
///
/// ```
/// use etagcache::http::{Method, Request};
/// use url::Url;
///
/// let url = Url::parse("http://api.example.com/tickets?page=2").unwrap();
/// let request = Request::new(Method::Get, url)
///     .header("Accept", "application/json");
///
/// let bytes = request.to_bytes();
/// let text = std::str::from_utf8(&bytes).unwrap();
/// assert!(text.starts_with("GET /tickets?page=2 HTTP/1.1\r\n"));
/// assert!(text.contains("Host: api.example.com\r\n"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Creates a request for `url` with no headers and an empty body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Shorthand for `Request::new(Method::Get, url)`.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Appends a request header. Multiple calls with the same name are additive.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    ///
    /// The `Content-Length` header is written automatically by [`to_bytes`](Self::to_bytes).
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the absolute target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the request headers for in-place modification.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Returns the request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the origin-form request target: path plus `?query` if any.
    pub fn target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_owned(),
        }
    }

    /// Returns the `Host` header value derived from the URL (with the port
    /// only when it differs from the scheme default).
    pub fn host(&self) -> Option<String> {
        let host = self.url.host_str()?;
        Some(match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        })
    }

    /// Serializes the request into HTTP/1.1 wire format.
    ///
    /// Automatically adds, unless already present:
    /// - `Host` derived from the URL.
    /// - `Connection: close` (the reference transport does not pool connections).
    ///
    /// `Content-Length` is written when the body is non-empty or the method
    /// carries a payload by convention (`POST`, `PUT`, `PATCH`).
    pub fn to_bytes(&self) -> BytesMut {
        let mut headers = Headers::with_capacity(self.headers.len() + 3);

        if !self.headers.contains(HOST) {
            if let Some(host) = self.host() {
                headers.insert(HOST, host);
            }
        }
        for (name, value) in self.headers.iter() {
            if !name.eq_ignore_ascii_case(CONTENT_LENGTH) {
                headers.insert(name, value);
            }
        }
        if !self.headers.contains(CONNECTION) {
            headers.insert(CONNECTION, "close");
        }

        let needs_length = !self.body.is_empty()
            || matches!(self.method, Method::Post | Method::Put | Method::Patch);
        if needs_length {
            headers.insert(CONTENT_LENGTH, self.body.len().to_string());
        }

        let estimated_size = 64 + headers.len() * 64 + self.body.len();
        let mut buf = BytesMut::with_capacity(estimated_size);

        // Request line
        buf.put(format!("{} {} HTTP/1.1\r\n", self.method, self.target()).as_bytes());

        // Headers
        buf.put(headers.to_string().as_bytes());

        // Header/body separator
        buf.put(&b"\r\n"[..]);

        if !self.body.is_empty() {
            buf.put(self.body.as_ref());
        }

        buf
    }
}

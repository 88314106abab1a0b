//! Received HTTP/1.1 responses, parsed with the [`httparse`] crate.

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use url::Url;

use super::headers::{CONTENT_LENGTH, ETAG};
use super::{Headers, StatusCode};

/// Errors that can occur while parsing an HTTP/1.1 response.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response is incomplete, more data needed")]
    Incomplete,

    #[error("HTTP parse error: {0}")]
    Parse(#[from] httparse::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid Content-Length header: {value:?}")]
    InvalidContentLength { value: String },

    #[error("malformed chunked transfer encoding")]
    InvalidChunk,
}

/// How the body of a response is delimited on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// 1xx, 204 and 304 responses never carry a body.
    Empty,
    Length(usize),
    Chunked,
    /// No length information: the body runs until the peer closes.
    UntilClose,
}

/// Which parts of the message a parse call expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parse {
    Body,
    /// The peer has closed; whatever follows the head is the body.
    BodyAtEof,
    /// Reply to `HEAD`: headers only.
    HeadOnly,
}

/// A completed HTTP response together with the URL it was fetched from.
///
/// Created by a transport, either via [`Response::parse`] from raw bytes or
/// directly with [`Response::new`]. The status is kept as the raw numeric
/// code so that codes without a [`StatusCode`] variant survive intact.
///
/// # Examples
///
/// ```
/// use etagcache::http::Response;
/// use url::Url;
///
/// let url = Url::parse("http://x/ticket").unwrap();
/// let raw = b"HTTP/1.1 200 OK\r\nETag: \"v1\"\r\nContent-Length: 2\r\n\r\n{}";
/// let (response, consumed) = Response::parse(url, raw).unwrap();
///
/// assert_eq!(consumed, raw.len());
/// assert_eq!(response.status_code(), 200);
/// assert_eq!(response.etag(), Some("\"v1\""));
/// assert_eq!(&response.body()[..], b"{}");
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    url: Url,
    status: u16,
    /// HTTP minor version: 0 for HTTP/1.0, 1 for HTTP/1.1.
    version: u8,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// Maximum number of headers we accept per response.
    const MAX_HEADERS: usize = 64;

    /// Creates an HTTP/1.1 response for `url` with no headers and an empty body.
    pub fn new(url: Url, status: u16) -> Self {
        Self {
            url,
            status,
            version: 1,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Parses a complete HTTP/1.1 response from `buf`.
    ///
    /// Returns the parsed `Response` and the number of bytes of `buf` it
    /// occupied. A response without `Content-Length` or chunked framing is
    /// delimited by connection close, so it is reported as
    /// [`ResponseError::Incomplete`] here; call [`parse_at_eof`](Self::parse_at_eof)
    /// once the peer has closed.
    ///
    /// # Errors
    ///
    /// - [`ResponseError::Incomplete`] — more data is needed.
    /// - [`ResponseError::Parse`] — the status line or headers are malformed.
    /// - [`ResponseError::MissingField`] — the status code or version is absent.
    /// - [`ResponseError::InvalidContentLength`] / [`ResponseError::InvalidChunk`] —
    ///   the body framing cannot be decoded.
    pub fn parse(url: Url, buf: &[u8]) -> Result<(Self, usize), ResponseError> {
        Self::parse_inner(url, buf, Parse::Body)
    }

    /// Like [`parse`](Self::parse), but treats the end of `buf` as the end of
    /// the connection so that close-delimited bodies are accepted.
    pub fn parse_at_eof(url: Url, buf: &[u8]) -> Result<(Self, usize), ResponseError> {
        Self::parse_inner(url, buf, Parse::BodyAtEof)
    }

    /// Parses the reply to a `HEAD` request.
    ///
    /// Such a reply never has a body, whatever its `Content-Length` or
    /// `Transfer-Encoding` say, so the response ends with its header section.
    pub fn parse_head(url: Url, buf: &[u8]) -> Result<(Self, usize), ResponseError> {
        Self::parse_inner(url, buf, Parse::HeadOnly)
    }

    fn parse_inner(url: Url, buf: &[u8], mode: Parse) -> Result<(Self, usize), ResponseError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw_res = httparse::Response::new(&mut headers);

        let body_offset = match raw_res.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(ResponseError::Incomplete),
        };

        let status = raw_res
            .code
            .ok_or(ResponseError::MissingField { field: "status" })?;
        let version = raw_res
            .version
            .ok_or(ResponseError::MissingField { field: "version" })?;

        let mut header_map = Headers::with_capacity(raw_res.headers.len());
        for header in raw_res.headers.iter() {
            if let Ok(value) = std::str::from_utf8(header.value) {
                header_map.insert(header.name, value);
            }
        }

        let rest = &buf[body_offset..];
        let body_framing = match mode {
            Parse::HeadOnly => Framing::Empty,
            Parse::Body | Parse::BodyAtEof => framing(status, &header_map)?,
        };
        let at_eof = mode == Parse::BodyAtEof;
        let (body, body_len) = match body_framing {
            Framing::Empty => (Bytes::new(), 0),
            Framing::Length(len) => {
                if rest.len() < len {
                    return Err(ResponseError::Incomplete);
                }
                (Bytes::copy_from_slice(&rest[..len]), len)
            }
            Framing::Chunked => decode_chunked(rest)?.ok_or(ResponseError::Incomplete)?,
            Framing::UntilClose if at_eof => (Bytes::copy_from_slice(rest), rest.len()),
            Framing::UntilClose => return Err(ResponseError::Incomplete),
        };

        Ok((
            Self {
                url,
                status,
                version,
                headers: header_map,
                body,
            },
            body_offset + body_len,
        ))
    }

    /// Returns the URL this response was fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Returns the status as a [`StatusCode`], if it is one we know by name.
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::try_from(self.status).ok()
    }

    /// Returns the HTTP minor version number (0 = HTTP/1.0, 1 = HTTP/1.1).
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the response body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the `ETag` header value, if the server sent one.
    pub fn etag(&self) -> Option<&str> {
        self.headers.get(ETAG)
    }

    /// Returns `true` if the server answered `304 Not Modified`.
    pub fn is_not_modified(&self) -> bool {
        self.status().is_some_and(StatusCode::is_not_modified)
    }

    /// Deserializes the body as JSON.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
    }
}

fn framing(status: u16, headers: &Headers) -> Result<Framing, ResponseError> {
    if (100..200).contains(&status)
        || status == StatusCode::NoContent.as_u16()
        || status == StatusCode::NotModified.as_u16()
    {
        return Ok(Framing::Empty);
    }

    let chunked = headers
        .get("transfer-encoding")
        .is_some_and(|te| te.to_ascii_lowercase().contains("chunked"));
    if chunked {
        return Ok(Framing::Chunked);
    }

    match headers.get(CONTENT_LENGTH) {
        Some(value) => value
            .trim()
            .parse()
            .map(Framing::Length)
            .map_err(|_| ResponseError::InvalidContentLength {
                value: value.to_owned(),
            }),
        None => Ok(Framing::UntilClose),
    }
}

/// Decodes a chunked body at the start of `buf`.
///
/// Returns `None` while the final zero-size chunk and its trailer section
/// have not fully arrived.
fn decode_chunked(buf: &[u8]) -> Result<Option<(Bytes, usize)>, ResponseError> {
    let mut body = BytesMut::new();
    let mut pos = 0;

    loop {
        let (offset, size) = match httparse::parse_chunk_size(&buf[pos..])
            .map_err(|_| ResponseError::InvalidChunk)?
        {
            httparse::Status::Complete(pair) => pair,
            httparse::Status::Partial => return Ok(None),
        };
        pos += offset;
        let size = usize::try_from(size).map_err(|_| ResponseError::InvalidChunk)?;

        if size == 0 {
            // Trailer fields, terminated by an empty line.
            loop {
                let Some(line_end) = find_crlf(&buf[pos..]) else {
                    return Ok(None);
                };
                pos += line_end + 2;
                if line_end == 0 {
                    return Ok(Some((body.freeze(), pos)));
                }
            }
        }

        // Chunk sizes come off the wire; a huge one must not overflow.
        let (chunk_end, next) = pos
            .checked_add(size)
            .and_then(|end| Some((end, end.checked_add(2)?)))
            .ok_or(ResponseError::InvalidChunk)?;
        if buf.len() < next {
            return Ok(None);
        }
        if &buf[chunk_end..next] != b"\r\n" {
            return Err(ResponseError::InvalidChunk);
        }
        body.extend_from_slice(&buf[pos..chunk_end]);
        pos = next;
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://x/ticket").unwrap()
    }

    #[test]
    fn parse_ok_with_etag() {
        let raw = b"HTTP/1.1 200 OK\r\nETag: W/\"abc\"\r\nContent-Length: 5\r\n\r\nhello";
        let (res, consumed) = Response::parse(url(), raw).unwrap();
        assert_eq!(res.status(), Some(StatusCode::Ok));
        assert_eq!(res.etag(), Some("W/\"abc\""));
        assert_eq!(&res.body()[..], b"hello");
        assert_eq!(consumed, raw.len());
        assert!(!res.is_not_modified());
    }

    #[test]
    fn not_modified_has_no_body() {
        let raw = b"HTTP/1.1 304 Not Modified\r\nContent-Length: 120\r\n\r\n";
        let (res, consumed) = Response::parse(url(), raw).unwrap();
        assert!(res.is_not_modified());
        assert!(res.body().is_empty());
        assert_eq!(res.etag(), None);
        assert_eq!(consumed, raw.len());
    }

    #[test]
    fn incomplete_head() {
        let raw = b"HTTP/1.1 200 OK\r\nETag:";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::Incomplete)
        ));
    }

    #[test]
    fn incomplete_body() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nhel";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::Incomplete)
        ));
    }

    #[test]
    fn close_delimited_body() {
        let raw = b"HTTP/1.0 200 OK\r\n\r\nuntil close";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::Incomplete)
        ));
        let (res, _) = Response::parse_at_eof(url(), raw).unwrap();
        assert_eq!(res.version(), 0);
        assert_eq!(&res.body()[..], b"until close");
    }

    #[test]
    fn chunked_body() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5;ext=1\r\npedia\r\n0\r\n\r\n";
        let (res, consumed) = Response::parse(url(), raw).unwrap();
        assert_eq!(&res.body()[..], b"Wikipedia");
        assert_eq!(consumed, raw.len());
    }

    #[test]
    fn chunked_body_waits_for_terminator() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n0\r\n";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::Incomplete)
        ));
    }

    #[test]
    fn oversized_chunk_size_is_rejected() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nffffffffffffffff\r\nab\r\n";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::InvalidChunk)
        ));
    }

    #[test]
    fn large_chunk_size_waits_for_data() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nffffffff\r\nab\r\n";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::Incomplete)
        ));
    }

    #[test]
    fn bad_chunk_terminator() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWikiXX0\r\n\r\n";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::InvalidChunk)
        ));
    }

    #[test]
    fn non_hex_chunk_size() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\nab\r\n0\r\n\r\n";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::InvalidChunk)
        ));
    }

    #[test]
    fn head_reply_ignores_content_length() {
        let raw = b"HTTP/1.1 200 OK\r\nETag: \"v1\"\r\nContent-Length: 100\r\n\r\n";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::Incomplete)
        ));
        let (res, consumed) = Response::parse_head(url(), raw).unwrap();
        assert_eq!(consumed, raw.len());
        assert_eq!(res.etag(), Some("\"v1\""));
        assert!(res.body().is_empty());
    }

    #[test]
    fn head_reply_ignores_chunked() {
        let raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n";
        let (res, consumed) = Response::parse_head(url(), raw).unwrap();
        assert_eq!(consumed, raw.len());
        assert!(res.body().is_empty());
    }

    #[test]
    fn bad_content_length() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: lots\r\n\r\n";
        assert!(matches!(
            Response::parse(url(), raw),
            Err(ResponseError::InvalidContentLength { .. })
        ));
    }

    #[test]
    fn unknown_status_is_kept() {
        let raw = b"HTTP/1.1 299 Whatever\r\nContent-Length: 0\r\n\r\n";
        let (res, _) = Response::parse(url(), raw).unwrap();
        assert_eq!(res.status_code(), 299);
        assert_eq!(res.status(), None);
    }

    #[test]
    fn json_body() {
        #[derive(serde::Deserialize)]
        struct Ticket {
            id: u64,
        }
        let res = Response::new(url(), 200).with_body(r#"{"id":7}"#);
        let ticket: Ticket = res.json().unwrap();
        assert_eq!(ticket.id, 7);
    }
}

//! Minimal HTTP/1.1 request parsing and response writing.
//!
//! Only what the API needs: one request per connection, bodies delimited by
//! `Content-Length`, responses always sent with `Connection: close`.

use crate::error::{ServerError, ServerResult};
use serde::Serialize;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum number of header lines accepted.
pub const MAX_HEADERS: usize = 64;

/// Maximum size of the request line plus headers, in bytes.
pub const MAX_HEAD_BYTES: usize = 16 * 1024;

/// Request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `OPTIONS`
    Options,
    /// Anything else.
    Other(String),
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Options => f.write_str("OPTIONS"),
            Method::Other(other) => f.write_str(other),
        }
    }
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Path without the query string.
    pub path: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Creates a request with no headers.
    pub fn new(method: Method, target: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            path: request_path(target).to_string(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Returns the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Extra headers (`Content-Length` and `Connection` are added on write).
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A response with no body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A response with a body of the given content type.
    pub fn bytes(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self::empty(status).with_header("Content-Type", content_type).with_body(body)
    }

    /// A JSON response. Serialization failure yields a bare 500.
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::bytes(status, "application/json", body),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                Self::empty(500)
            }
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Returns the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Reason phrase for the status codes this server emits.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn request_path(target: &str) -> &str {
    target.split_once('?').map_or(target, |(path, _)| path)
}

/// Reads one request.
///
/// Returns `Ok(None)` if the peer closed the connection before sending
/// anything.
pub async fn read_request<R>(reader: &mut R, max_body: usize) -> ServerResult<Option<HttpRequest>>
where
    R: AsyncBufRead + Unpin,
{
    let mut head_bytes = 0usize;
    let mut line = String::new();

    let n = read_head_line(reader, &mut line, &mut head_bytes).await?;
    if n == 0 {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ServerError::MalformedHttp(format!(
            "bad request line: {:?}",
            line.trim_end()
        )));
    };
    if !version.starts_with("HTTP/1.") {
        return Err(ServerError::MalformedHttp(format!(
            "unsupported version: {version}"
        )));
    }
    let mut request = HttpRequest::new(Method::parse(method), target, Vec::new());

    loop {
        line.clear();
        let n = read_head_line(reader, &mut line, &mut head_bytes).await?;
        if n == 0 {
            return Err(ServerError::MalformedHttp("connection closed in headers".into()));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        if request.headers.len() >= MAX_HEADERS {
            return Err(ServerError::MalformedHttp("too many headers".into()));
        }
        let Some((name, value)) = trimmed.split_once(':') else {
            return Err(ServerError::MalformedHttp(format!("bad header: {trimmed:?}")));
        };
        request
            .headers
            .push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
    }

    if request
        .header("transfer-encoding")
        .is_some_and(|te| !te.eq_ignore_ascii_case("identity"))
    {
        return Err(ServerError::MalformedHttp(
            "chunked request bodies are not supported".into(),
        ));
    }

    let content_length = match request.header("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| ServerError::MalformedHttp(format!("bad content-length: {value:?}")))?,
        None => 0,
    };
    if content_length > max_body {
        return Err(ServerError::PayloadTooLarge { limit: max_body });
    }

    let mut body = vec![0u8; content_length];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::UnexpectedEof => ServerError::MalformedHttp(format!(
                "body shorter than content-length {content_length}"
            )),
            _ => ServerError::Io(err),
        })?;
    request.body = body;

    Ok(Some(request))
}

async fn read_head_line<R>(
    reader: &mut R,
    line: &mut String,
    head_bytes: &mut usize,
) -> ServerResult<usize>
where
    R: AsyncBufRead + Unpin,
{
    let remaining = MAX_HEAD_BYTES.saturating_sub(*head_bytes);
    // One extra byte tells an exactly-full head apart from an oversized one.
    let limit = u64::try_from(remaining).unwrap_or(u64::MAX) + 1;
    let n = (&mut *reader)
        .take(limit)
        .read_line(line)
        .await
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::InvalidData => {
                ServerError::MalformedHttp("request head is not UTF-8".into())
            }
            _ => ServerError::Io(err),
        })?;
    *head_bytes += n;
    if *head_bytes > MAX_HEAD_BYTES {
        return Err(ServerError::MalformedHttp("request head too large".into()));
    }
    Ok(n)
}

/// Writes a response and flushes.
pub async fn write_response<W>(writer: &mut W, response: &HttpResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason_phrase(response.status)
    );
    for (name, value) in &response.headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    head.push_str("Connection: close\r\n\r\n");

    writer.write_all(head.as_bytes()).await?;
    writer.write_all(&response.body).await?;
    writer.flush().await
}

use bytes::Bytes;
use tokio::fs::File;

use crate::http::resolver::ResolvedResource;

/// HTTP status codes supported by the server.
///
/// - `Ok` (200): File or greeting served
/// - `BadRequest` (400): Request head exceeded the size limit
/// - `Forbidden` (403): Path escaped the document root
/// - `NotFound` (404): Nothing to serve at that path
/// - `InternalServerError` (500): Document root unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use sandstone::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Response payload.
#[derive(Debug)]
pub enum Body {
    /// Status line and headers only
    Empty,
    /// A fixed in-memory body
    Bytes(Bytes),
    /// Streamed from an open file until EOF
    File(File),
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers are written in insertion order. No `Content-Length` is added:
/// the connection is closed after every response, which delimits the body.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as name/value pairs
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/css")
///     .file(file)
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Adds a header, replacing any earlier one with the same name
    /// (compared case-insensitively).
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets an in-memory body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    /// Streams the body from `file`.
    pub fn file(mut self, file: File) -> Self {
        self.body = Body::File(file);
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a 200 OK response with a fixed body and no headers.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// Creates a 200 OK response streaming `file` as `mime_type`.
    pub fn file(file: File, mime_type: &str) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", mime_type)
            .file(file)
            .build()
    }

    /// Creates a bodiless response carrying only the status line.
    pub fn status_only(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    pub fn bad_request() -> Self {
        Self::status_only(StatusCode::BadRequest)
    }

    pub fn forbidden() -> Self {
        Self::status_only(StatusCode::Forbidden)
    }

    pub fn not_found() -> Self {
        Self::status_only(StatusCode::NotFound)
    }

    pub fn internal_error() -> Self {
        Self::status_only(StatusCode::InternalServerError)
    }

    /// Maps a resolution outcome onto its response, consuming the file handle.
    pub fn from_resolved(resource: ResolvedResource) -> Self {
        match resource {
            ResolvedResource::Ok { file, mime_type } => Self::file(file, mime_type),
            ResolvedResource::NotFound => Self::not_found(),
            ResolvedResource::Forbidden => Self::forbidden(),
            ResolvedResource::ServerError => Self::internal_error(),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Header names the parser keeps. Everything else is dropped on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderName {
    /// Content-Type
    ContentType,
    /// Host
    Host,
    /// User-Agent
    UserAgent,
}

impl HeaderName {
    /// Matches a raw header name against the allowlist.
    ///
    /// Header names are case-insensitive on the wire, so `host` and `HOST`
    /// both map to [`HeaderName::Host`].
    ///
    /// # Example
    ///
    /// ```
    /// # use sandstone::http::request::HeaderName;
    /// assert_eq!(HeaderName::from_name("user-agent"), Some(HeaderName::UserAgent));
    /// assert_eq!(HeaderName::from_name("Accept"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::ContentType, Self::Host, Self::UserAgent]
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderName::ContentType => "Content-Type",
            HeaderName::Host => "Host",
            HeaderName::UserAgent => "User-Agent",
        }
    }
}

/// The fixed set of request headers a [`Request`] remembers.
///
/// Each slot is either absent or holds the value of the last occurrence of
/// that header. A header sent with an empty value is `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedHeaders {
    pub content_type: Option<String>,
    pub host: Option<String>,
    pub user_agent: Option<String>,
}

impl RecognizedHeaders {
    /// Stores `value` if `name` is allowlisted. Returns whether it was kept.
    pub fn insert(&mut self, name: &str, value: &str) -> bool {
        match HeaderName::from_name(name) {
            Some(header) => {
                *self.slot_mut(header) = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, header: HeaderName) -> Option<&str> {
        match header {
            HeaderName::ContentType => self.content_type.as_deref(),
            HeaderName::Host => self.host.as_deref(),
            HeaderName::UserAgent => self.user_agent.as_deref(),
        }
    }

    fn slot_mut(&mut self, header: HeaderName) -> &mut Option<String> {
        match header {
            HeaderName::ContentType => &mut self.content_type,
            HeaderName::Host => &mut self.host,
            HeaderName::UserAgent => &mut self.user_agent,
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Request-line fields are `None` when the corresponding token was missing.
/// Methods are kept verbatim; nothing downstream treats GET and POST
/// differently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method token (e.g. "GET")
    pub method: Option<String>,
    /// The request target (e.g. "/index.html")
    pub path: Option<String>,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: Option<String>,
    pub headers: RecognizedHeaders,
}

impl Request {
    /// Retrieves a recognized header value by name, case-insensitively.
    ///
    /// Returns `None` for headers outside the allowlist as well as for
    /// allowlisted headers the client did not send.
    pub fn header(&self, key: &str) -> Option<&str> {
        HeaderName::from_name(key).and_then(|h| self.headers.get(h))
    }

    /// True once method, path and version were all extracted.
    pub fn is_complete(&self) -> bool {
        self.method.is_some() && self.path.is_some() && self.version.is_some()
    }
}

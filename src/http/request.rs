use crate::http::parser::is_blank;

/// HTTP request methods accepted by the server.
///
/// Anything outside this set makes the request malformed; there is no
/// 405 path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Submit data (served like GET)
    POST,
    /// HEAD - Served like GET, body included
    HEAD,
    /// PUT - Replace a resource (served like GET)
    PUT,
    /// DELETE - Delete a resource (served like GET)
    DELETE,
}

/// Protocol versions accepted on the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

/// The header block exactly as read off the wire.
///
/// Each entry is one line with its line terminator removed. When the client
/// sent the blank separator line, it is kept as the final (empty) entry;
/// a stream that ended early simply lacks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    pub lines: Vec<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// The HTTP method
    pub method: Method,
    /// The request target, e.g. "/index.html"
    pub target: String,
    /// Protocol version from the request line
    pub version: Version,
    /// Header fields in arrival order, duplicates preserved
    pub headers: Vec<(String, String)>,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use statik::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("PATCH"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "HEAD" => Some(Method::HEAD),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::HEAD => "HEAD",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl Version {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HTTP/1.0" => Some(Version::Http10),
            "HTTP/1.1" => Some(Version::Http11),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl RawRequest {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// True when nothing, not even a blank line, was received.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when the final captured line is the blank header terminator.
    pub fn is_terminated(&self) -> bool {
        self.lines
            .last()
            .is_some_and(|line| is_blank(line.as_bytes()))
    }

    /// The request line, if any line was captured.
    pub fn request_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    /// Header lines: everything after the request line, minus the blank
    /// terminator when present.
    pub fn header_lines(&self) -> &[String] {
        if self.lines.len() < 2 {
            return &[];
        }
        let end = if self.is_terminated() {
            self.lines.len() - 1
        } else {
            self.lines.len()
        };
        &self.lines[1..end]
    }
}

impl ParsedRequest {
    /// Retrieves the first header with the given name.
    ///
    /// Field names compare case-sensitively, matching how the validator
    /// recognizes them.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The Host header value, e.g. "127.0.0.1:6789".
    pub fn host(&self) -> Option<&str> {
        self.header("Host")
    }

    /// The request target with a single trailing '/' removed.
    pub fn target_without_trailing_slash(&self) -> &str {
        self.target.strip_suffix('/').unwrap_or(&self.target)
    }
}

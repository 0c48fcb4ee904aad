use bytes::Bytes;

use crate::http::mime::ContentType;

/// HTTP status codes the server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 400 Bad Request
    BadRequest,
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
    /// # use statik::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Response payload: decoded text or raw bytes, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Binary(Bytes),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete HTTP response ready to be written.
///
/// Headers keep insertion order; no `Content-Length` is added since every
/// connection closes after one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .text("<html></html>")
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Body,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Text(String::new()),
        }
    }

    /// Appends a header. Duplicates are kept.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header("Content-Type", content_type.header_value())
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Body::Text(body.into());
        self
    }

    pub fn binary(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::Binary(body.into());
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
    /// 200 with the resource's text lines concatenated, line breaks dropped.
    pub fn ok_html(resource: &[u8]) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(ContentType::Html)
            .text(flatten_lines(&String::from_utf8_lossy(resource)))
            .build()
    }

    /// 200 carrying the image bytes unchanged.
    pub fn ok_image(resource: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(ContentType::Image)
            .binary(resource)
            .build()
    }

    /// 301 pointing at `location`, with the moved-permanently template as body.
    pub fn moved_permanently(location: &str, template: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::MovedPermanently)
            .header("Location", location)
            .content_type(ContentType::Html)
            .text(template)
            .build()
    }

    pub fn bad_request(template: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .content_type(ContentType::Html)
            .text(template)
            .build()
    }

    pub fn not_found(template: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .content_type(ContentType::Html)
            .text(template)
            .build()
    }

    /// 500 for a resource that exists but could not be read.
    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .content_type(ContentType::Html)
            .text("500 Internal Server Error")
            .build()
    }

    /// Retrieves the first header with the given name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Joins the lines of `text` with no separator.
///
/// `\r\n`, `\n` and a lone `\r` all end a line.
pub fn flatten_lines(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

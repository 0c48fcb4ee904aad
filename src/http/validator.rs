//! Request validation.
//!
//! A captured header block is either turned into a [`ParsedRequest`] or
//! rejected with a [`Malformed`] reason. Every rejection becomes a
//! `400 Bad Request`; the reason only feeds the logs.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::http::request::{Method, ParsedRequest, RawRequest, Version};

/// Header field names accepted besides `Host`.
pub const RECOGNIZED_HEADERS: &[&str] = &[
    "Accept",
    "Accept-Charset",
    "Accept-Encoding",
    "Accept-Language",
    "Accept-Datetime",
    "Cache-Control",
    "Connection",
    "Cookie",
    "Content-Length",
    "Content-MD5",
    "Content-Type",
    "Date",
    "Expect",
    "From",
    "Host",
    "If-Match",
    "If-Modified-Since",
    "If-None-Match",
    "If-Range",
    "If-Unmodified-Since",
    "Max-Forwards",
    "Origins",
    "Pragma",
    "Proxy-Authorization",
    "Proxy-Connection",
    "Range",
    "Referer",
    "TE",
    "User-Agent",
    "Via",
    "Warning",
];

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("empty request")]
    EmptyRequest,
    #[error("header block not terminated by a blank line")]
    MissingTerminator,
    #[error("request line must have exactly 3 tokens: {0:?}")]
    RequestLineShape(String),
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("invalid request target: {0}")]
    InvalidTarget(String),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("expected exactly one Host header, found {0}")]
    HostHeaderCount(usize),
    #[error("invalid Host header: {0:?}")]
    InvalidHostHeader(String),
    #[error("unrecognized header field: {0:?}")]
    UnrecognizedHeader(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(ParsedRequest),
    Malformed(Malformed),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

/// Validates a captured header block.
///
/// Checks, in order: the blank-line terminator, the request line
/// (`METHOD target VERSION`), a single well-formed Host header, and that
/// every other header field is recognized.
pub fn validate(raw: &RawRequest) -> ValidationOutcome {
    match check(raw) {
        Ok(request) => ValidationOutcome::Valid(request),
        Err(reason) => ValidationOutcome::Malformed(reason),
    }
}

fn check(raw: &RawRequest) -> Result<ParsedRequest, Malformed> {
    if raw.is_empty() {
        return Err(Malformed::EmptyRequest);
    }
    if !raw.is_terminated() {
        return Err(Malformed::MissingTerminator);
    }

    let request_line = raw.request_line().unwrap_or_default();
    let (method, target, version) = check_request_line(request_line)?;

    let header_lines = raw.header_lines();
    let host_index = check_host_header(header_lines)?;

    for (index, line) in header_lines.iter().enumerate() {
        if index == host_index {
            continue;
        }
        let field = line.split(' ').next().unwrap_or_default().trim();
        if !is_recognized_field(field) {
            return Err(Malformed::UnrecognizedHeader(line.clone()));
        }
    }

    let headers = header_lines
        .iter()
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    Ok(ParsedRequest {
        method,
        target: target.to_string(),
        version,
        headers,
    })
}

fn check_request_line(line: &str) -> Result<(Method, &str, Version), Malformed> {
    let tokens = split_spaces(line);
    let &[method, target, version] = tokens.as_slice() else {
        return Err(Malformed::RequestLineShape(line.to_string()));
    };

    let method =
        Method::from_str(method).ok_or_else(|| Malformed::UnsupportedMethod(method.to_string()))?;

    if target.trim() != "/" && !target_pattern().is_match(target) {
        return Err(Malformed::InvalidTarget(target.to_string()));
    }

    let version = Version::from_str(version)
        .ok_or_else(|| Malformed::UnsupportedVersion(version.to_string()))?;

    Ok((method, target, version))
}

/// Returns the index of the single Host line within `header_lines`.
fn check_host_header(header_lines: &[String]) -> Result<usize, Malformed> {
    let mut hosts = header_lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains("Host:"));

    let (index, line) = match (hosts.next(), hosts.count()) {
        (Some(found), 0) => found,
        (None, _) => return Err(Malformed::HostHeaderCount(0)),
        (Some(_), rest) => return Err(Malformed::HostHeaderCount(rest + 1)),
    };

    let tokens = split_spaces(line);
    match tokens.as_slice() {
        ["Host:", host] if host_pattern().is_match(host.trim()) => Ok(index),
        _ => Err(Malformed::InvalidHostHeader(line.clone())),
    }
}

fn is_recognized_field(token: &str) -> bool {
    token
        .strip_suffix(':')
        .is_some_and(|name| RECOGNIZED_HEADERS.contains(&name))
}

/// Splits on single spaces, dropping trailing empty tokens.
///
/// Interior empty tokens are kept, so "GET  / HTTP/1.1" yields four tokens.
fn split_spaces(line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = line.split(' ').collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }
    tokens
}

fn target_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:/[A-Za-z0-9_.]+)+/?$").expect("target pattern compiles")
    })
}

// Optional "http://", dot-separated word labels, optional 4-digit port
fn host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(?:http://)?(?:[A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]+)?(?::[0-9]{4})?$")
            .expect("host pattern compiles")
    })
}

use crate::http::request::RawRequest;

/// Returns the offset just past the blank line that ends the header block,
/// or `None` if no blank line has arrived yet.
pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    let mut start = 0;

    while let Some(offset) = buf[start..].iter().position(|&b| b == b'\n') {
        let end = start + offset;
        if is_blank(&buf[start..end]) {
            return Some(end + 1);
        }
        start = end + 1;
    }

    None
}

/// Splits a header block into lines.
///
/// Reading stops after the first blank line, which is kept as the final
/// entry. If the buffer has no blank line the lines are still returned,
/// including a trailing unterminated one; the validator rejects such a
/// request. Parsing itself never fails.
pub fn parse_raw_request(buf: &[u8]) -> RawRequest {
    let mut lines = Vec::new();
    let mut rest = buf;

    while !rest.is_empty() {
        let (line, next) = match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, &rest[rest.len()..]),
        };

        let line = line.strip_suffix(b"\r".as_slice()).unwrap_or(line);
        let blank = is_blank(line);
        lines.push(String::from_utf8_lossy(line).into_owned());

        if blank {
            break;
        }
        rest = next;
    }

    RawRequest::new(lines)
}

/// True when the line holds only spaces and control characters.
///
/// Shared with [`RawRequest::is_terminated`] so the reader and the
/// validator agree on where the header block ends.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|&b| b <= b' ')
}

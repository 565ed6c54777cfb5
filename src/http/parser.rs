use crate::http::request::{RecognizedHeaders, Request};

const REQUEST_LINE_DELIMITER: char = ' ';
const HEADER_DELIMITER: &str = ": ";

/// Position of the scanner. It only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    RequestLine,
    Headers,
}

/// Parses a request head into a [`Request`].
///
/// The parser is lenient: it never fails. Missing request-line tokens leave
/// the matching fields `None`, malformed or unknown header lines are skipped,
/// and every such condition is logged. Only CRLF-terminated lines are
/// considered; a trailing fragment without a line ending is ignored. The scan
/// never looks past `buf.len()`, so callers pass exactly the bytes they read.
pub fn parse_request(buf: &[u8]) -> Request {
    let mut request = Request::default();
    let mut state = ParseState::RequestLine;
    let mut start = 0;

    for index in 1..buf.len() {
        if buf[index - 1] != b'\r' || buf[index] != b'\n' {
            continue;
        }

        let segment = String::from_utf8_lossy(&buf[start..index - 1]);

        match state {
            ParseState::RequestLine => {
                parse_request_line(&mut request, &segment);
                state = ParseState::Headers;
            }
            ParseState::Headers => parse_header_line(&mut request.headers, &segment),
        }

        start = index + 1;
    }

    if state == ParseState::RequestLine {
        tracing::debug!(bytes = buf.len(), "No complete request line in buffer");
    }

    request
}

/// Returns the length of the request head, including the blank line that
/// terminates it, or `None` if the terminator has not arrived yet.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

fn parse_request_line(request: &mut Request, line: &str) {
    let mut tokens = line
        .split(REQUEST_LINE_DELIMITER)
        .filter(|token| !token.is_empty());

    let Some(method) = tokens.next() else {
        tracing::warn!("Missing method in request line");
        return;
    };
    request.method = Some(method.to_string());

    let Some(path) = tokens.next() else {
        tracing::warn!(method, "Missing path in request line");
        return;
    };
    request.path = Some(path.to_string());

    let Some(version) = tokens.next() else {
        tracing::warn!(method, path, "Missing HTTP version in request line");
        return;
    };
    request.version = Some(version.to_string());

    let extra = tokens.count();
    if extra > 0 {
        tracing::debug!(extra, "Ignoring trailing tokens in request line");
    }
}

fn parse_header_line(headers: &mut RecognizedHeaders, line: &str) {
    // Blank line ending the head.
    if line.is_empty() {
        return;
    }

    let Some((name, value)) = line.split_once(HEADER_DELIMITER) else {
        tracing::debug!(line, "Skipping header line without delimiter");
        return;
    };

    if !headers.insert(name, value) {
        tracing::trace!(name, "Dropping unrecognized header");
    }
}

//! Parse HTTP response header lines collected by libcurl.

/// Headers of the final response of a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// `Content-Length`, if the server reported a parseable one.
    pub content_length: Option<u64>,
}

/// Parse collected header lines into the headers of the last response.
///
/// With redirects followed, libcurl hands over every response's headers in
/// order; each status line starts a new block, so earlier values are discarded.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                out.content_length = value.parse::<u64>().ok();
            }
        }
    }

    out
}

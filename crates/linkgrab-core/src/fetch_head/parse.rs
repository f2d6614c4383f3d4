//! Parse HTTP response header lines collected during a HEAD request.

/// Status code from a status line such as `HTTP/1.1 200 OK` or `HTTP/2 404`.
pub(crate) fn status_code(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// `Content-Length` of the final response. Header blocks of redirect hops are
/// skipped: every status line starts a new block.
pub(crate) fn final_content_length(lines: &[String]) -> Option<u64> {
    let mut content_length = None;
    for line in lines {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            content_length = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<u64>().ok();
            }
        }
    }
    content_length
}

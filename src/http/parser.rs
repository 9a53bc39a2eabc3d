/// Extracts the request target from the raw bytes of a request.
///
/// The buffer is read like a C string (it ends at the first NUL byte) and
/// split on ASCII whitespace. The first token is the method, which is not
/// checked; the second token is returned as an owned copy. `None` means the
/// request had fewer than two tokens.
///
/// The target is decoded lossily: bytes that are not valid UTF-8 become
/// U+FFFD, so a file whose on-disk name is not UTF-8 cannot be requested
/// and gets the error page.
pub fn parse_request_target(buf: &[u8]) -> Option<String> {
    let text = buf.split(|&b| b == 0).next().unwrap_or_default();

    let mut tokens = text
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    let _method = tokens.next()?;
    let target = tokens.next()?;

    Some(String::from_utf8_lossy(target).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";

        assert_eq!(parse_request_target(req).as_deref(), Some("/index.html"));
    }

    #[test]
    fn invalid_utf8_target_is_replaced() {
        let req = b"GET /caf\xe9.html HTTP/1.1\r\n";

        assert_eq!(parse_request_target(req).as_deref(), Some("/caf\u{FFFD}.html"));
    }

    #[test]
    fn input_is_left_untouched() {
        let req = b"GET /a HTTP/1.1\r\n".to_vec();
        let before = req.clone();

        let _ = parse_request_target(&req);
        assert_eq!(req, before);
    }
}

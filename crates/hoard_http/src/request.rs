//! Client request parsing.

/// The two pieces of a recognized client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRequest {
    pub path: String,
    pub host: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("request does not match 'GET <path> HTTP/1.0' + 'Host:' shape")]
    Malformed,
}

/// Parses the one request shape the proxy accepts:
///
/// ```text
/// GET <path> HTTP/1.0\r\n
/// Host: <host>\r\n
/// ```
///
/// Any additional headers after the `Host:` line are ignored. A
/// different method, a different HTTP version, or a missing/garbled
/// `Host:` line is `Malformed`; callers must not contact the origin
/// on that outcome.
pub fn parse_request(raw: &[u8]) -> Result<ClientRequest, RequestError> {
    let text = std::str::from_utf8(raw).map_err(|_| RequestError::Malformed)?;

    // Both lines must be CRLF-terminated.
    let Some((request_line, rest)) = text.split_once("\r\n") else {
        return Err(RequestError::Malformed);
    };
    let Some((host_line, _)) = rest.split_once("\r\n") else {
        return Err(RequestError::Malformed);
    };

    let mut parts = request_line.split_whitespace();
    if parts.next() != Some("GET") {
        return Err(RequestError::Malformed);
    }
    let Some(path) = parts.next() else {
        return Err(RequestError::Malformed);
    };
    if parts.next() != Some("HTTP/1.0") || parts.next().is_some() {
        return Err(RequestError::Malformed);
    }

    let Some(host_value) = host_line.strip_prefix("Host:") else {
        return Err(RequestError::Malformed);
    };
    let host = host_value.trim();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(RequestError::Malformed);
    }

    Ok(ClientRequest {
        path: path.to_string(),
        host: host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_request, RequestError};

    #[test]
    fn parse_request_accepts_minimal_get() {
        let raw = b"GET /index.html HTTP/1.0\r\nHost: example.test\r\n";
        let req = parse_request(raw).expect("expected ok");
        assert_eq!(req.path, "/index.html");
        assert_eq!(req.host, "example.test");
    }

    #[test]
    fn parse_request_ignores_trailing_headers() {
        let raw =
            b"GET / HTTP/1.0\r\nHost: example.test\r\nUser-Agent: curl/8.0\r\nAccept: */*\r\n\r\n";
        let req = parse_request(raw).expect("expected ok");
        assert_eq!(req.path, "/");
        assert_eq!(req.host, "example.test");
    }

    #[test]
    fn parse_request_rejects_post() {
        let raw = b"POST /x HTTP/1.1\r\nHost: example.test\r\n";
        assert_eq!(parse_request(raw).unwrap_err(), RequestError::Malformed);
    }

    #[test]
    fn parse_request_rejects_http_1_1() {
        let raw = b"GET / HTTP/1.1\r\nHost: example.test\r\n";
        assert_eq!(parse_request(raw).unwrap_err(), RequestError::Malformed);
    }

    #[test]
    fn parse_request_rejects_missing_host() {
        let raw = b"GET / HTTP/1.0\r\nUser-Agent: curl/8.0\r\n";
        assert_eq!(parse_request(raw).unwrap_err(), RequestError::Malformed);
    }

    #[test]
    fn parse_request_rejects_unterminated_host_line() {
        let raw = b"GET / HTTP/1.0\r\nHost: example.test";
        assert_eq!(parse_request(raw).unwrap_err(), RequestError::Malformed);
    }
}

//! Origin connector.
//!
//! Opens a transport connection to an origin server, writes a
//! HTTP/1.0 request and reads the response until the peer closes.
//! End of response is defined solely by peer closure; there is no
//! content-length or chunked-transfer awareness. An origin that holds
//! the connection open (HTTP/1.1 behavior) stalls the fetch — an
//! accepted limitation of the HTTP/1.0-only design.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Resolution failed or every resolved address refused the
    /// connection.
    #[error("failed to reach origin {host}:{port}")]
    Unreachable {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("origin exchange failed")]
    Exchange(#[from] std::io::Error),
}

/// Resolves `host` and attempts each returned address in order until
/// one accepts the connection.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream, ConnectError> {
    info!(target: "hoard::upstream", %host, port, "Connecting to origin");

    // TcpStream::connect on a (host, port) pair resolves the name and
    // tries every address before giving up.
    TcpStream::connect((host, port))
        .await
        .map_err(|source| ConnectError::Unreachable {
            host: host.to_string(),
            port,
            source,
        })
}

/// Writes `request` and reads the full response until the peer
/// closes, concatenating everything received.
pub async fn fetch(stream: &mut TcpStream, request: &[u8]) -> std::io::Result<Vec<u8>> {
    stream.write_all(request).await?;
    stream.flush().await?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await?;

    debug!(
        target: "hoard::upstream",
        bytes = response.len(),
        "Origin closed connection"
    );
    Ok(response)
}

/// Connect-and-fetch in one step.
pub async fn fetch_page(host: &str, port: u16, request: &[u8]) -> Result<Vec<u8>, ConnectError> {
    let mut stream = connect(host, port).await?;
    Ok(fetch(&mut stream, request).await?)
}

/// `GET <path> HTTP/1.0\r\nHost: <host>\r\n\r\n`
pub fn plain_request(path: &str, host: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("GET {path} HTTP/1.0\r\n").as_bytes());
    out.extend_from_slice(format!("Host: {host}\r\n").as_bytes());
    out.extend_from_slice(b"\r\n");
    out
}

/// The plain request with `If-Modified-Since` appended after the
/// blank line, as a second trailing block. This is the literal wire
/// shape of the original deployment, kept byte-for-byte: origins that
/// stop at the first blank line see a plain GET and answer with a
/// full response, which degrades safely.
pub fn conditional_request(path: &str, host: &str, stamp: &str) -> Vec<u8> {
    let mut out = plain_request(path, host);
    out.extend_from_slice(format!("If-Modified-Since: {stamp}\r\n").as_bytes());
    out.extend_from_slice(b"\r\n");
    out
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::{conditional_request, connect, fetch, plain_request, ConnectError};

    #[test]
    fn plain_request_wire_shape() {
        assert_eq!(
            plain_request("/index.html", "example.test"),
            b"GET /index.html HTTP/1.0\r\nHost: example.test\r\n\r\n"
        );
    }

    #[test]
    fn conditional_request_appends_second_block() {
        let raw = conditional_request("/index.html", "example.test", "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(
            raw,
            b"GET /index.html HTTP/1.0\r\nHost: example.test\r\n\r\n\
              If-Modified-Since: Wed, 21 Oct 2015 07:28:00 GMT\r\n\r\n"
                .as_slice()
        );
    }

    #[tokio::test]
    async fn fetch_reads_until_peer_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.expect("accept");
            let mut req = vec![0u8; 1024];
            let n = peer.read(&mut req).await.expect("read");
            assert!(req[..n].starts_with(b"GET /ping HTTP/1.0\r\n"));

            // Response in two writes; fetch must concatenate both.
            peer.write_all(b"HTTP/1.0 200 OK\r\n\r\npart one ").await.expect("write");
            peer.write_all(b"and part two").await.expect("write");
            // Dropping the stream closes the connection.
        });

        let mut stream = connect("127.0.0.1", addr.port()).await.expect("connect");
        let response = fetch(&mut stream, &plain_request("/ping", "127.0.0.1")).await.expect("fetch");
        server.await.expect("server task");

        assert_eq!(response, b"HTTP/1.0 200 OK\r\n\r\npart one and part two");
    }

    #[tokio::test]
    async fn connect_refused_is_unreachable() {
        // Bind a port, then drop the listener so the port is closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let err = connect("127.0.0.1", addr.port()).await.unwrap_err();
        assert!(matches!(err, ConnectError::Unreachable { .. }));
    }
}

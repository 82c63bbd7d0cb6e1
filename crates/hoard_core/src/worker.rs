//! Per-connection pipeline.
//!
//! Each accepted client goes through one pass: read the request,
//! parse it, fetch the page from the origin, resolve the result
//! against the cache (inserting on a miss, revalidating on a hit)
//! and write the body back. Success and every failure end the same
//! way, with the connection closed.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use hoard_cache::{policy, CacheEntry, CacheKey, PageCache};
use hoard_config::ProxyConfig;
use hoard_http::{request, response};
use hoard_upstream as upstream;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

/// Entry point for one client connection.
#[instrument(skip(stream, cache, cfg), fields(client = %client_addr))]
pub async fn handle_connection(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    cache: Arc<PageCache>,
    cfg: Arc<ProxyConfig>,
) -> anyhow::Result<()> {
    // One read bounded by the receive buffer; a full request is
    // expected to arrive in a single chunk.
    let mut buf = BytesMut::with_capacity(cfg.recv_buffer_bytes);
    let n = stream.read_buf(&mut buf).await?;
    if n == 0 {
        debug!(target: "hoard::worker", "Client closed before sending a request");
        return Ok(());
    }

    let req = match request::parse_request(&buf) {
        Ok(req) => req,
        Err(err) => {
            // No origin contact on a request we did not recognize.
            warn!(target: "hoard::worker", error = %err, "Rejecting malformed request");
            return Ok(());
        }
    };
    debug!(
        target: "hoard::worker",
        host = %req.host,
        path = %req.path,
        "Parsed client request"
    );

    // The origin is always consulted first; the cache decides
    // afterwards what is actually served.
    let plain = upstream::plain_request(&req.path, &req.host);
    let raw = match upstream::fetch_page(&req.host, cfg.upstream_port, &plain).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(
                target: "hoard::worker",
                host = %req.host,
                error = %err,
                "Origin fetch failed; closing client"
            );
            return Ok(());
        }
    };

    let headers = response::parse_headers(&raw);
    let body = response::parse_body(&raw);
    if body.is_empty() {
        warn!(
            target: "hoard::worker",
            host = %req.host,
            path = %req.path,
            "Could not extract a body from the origin response; closing client"
        );
        return Ok(());
    }

    let fetched = CacheEntry::new(
        &req.host,
        &req.path,
        body,
        &headers.date,
        &headers.last_modified,
        &headers.expires,
    );
    let resolved = resolve_cache(&cache, fetched, cfg.upstream_port).await;

    // The client gets the raw page body only; the proxy never
    // synthesizes a status line or headers of its own.
    stream.write_all(&resolved.body).await?;
    stream.flush().await?;

    info!(target: "hoard::worker", "Done serving client");
    Ok(())
}

/// Resolves a freshly fetched page against the cache: a miss stores
/// and serves it, a hit puts the *cached* entry through the
/// revalidation exchange instead.
pub async fn resolve_cache(
    cache: &PageCache,
    fetched: CacheEntry,
    upstream_port: u16,
) -> CacheEntry {
    let key = CacheKey::new(&fetched.host, &fetched.path);

    match cache.lookup(&key) {
        None => {
            info!(
                target: "hoard::worker",
                host = %key.host,
                path = %key.path,
                "Cache miss; storing fetched page"
            );
            cache.insert(key, fetched.clone());
            fetched
        }
        Some(cached) => revalidate(cache, key, cached, upstream_port).await,
    }
}

/// The conditional-GET exchange for a cache hit.
///
/// Every inconclusive outcome (no usable timestamp, no response,
/// empty extracted body) falls back to the cached entry, unmodified
/// and with the store untouched, logged as possibly stale. Only a
/// response with a non-empty body refreshes the cache.
async fn revalidate(
    cache: &PageCache,
    key: CacheKey,
    cached: CacheEntry,
    upstream_port: u16,
) -> CacheEntry {
    let Some(stamp) = policy::revalidation_timestamp(&cached) else {
        warn!(
            target: "hoard::worker",
            host = %key.host,
            path = %key.path,
            "No usable timestamp to revalidate with; serving cached copy, page may be stale"
        );
        return cached;
    };

    info!(
        target: "hoard::worker",
        host = %key.host,
        path = %key.path,
        %stamp,
        "Sending If-Modified-Since request"
    );

    let conditional = upstream::conditional_request(&cached.path, &cached.host, &stamp);
    let raw = match upstream::fetch_page(&cached.host, upstream_port, &conditional).await {
        Ok(raw) if !raw.is_empty() => raw,
        Ok(_) | Err(_) => {
            warn!(
                target: "hoard::worker",
                host = %key.host,
                path = %key.path,
                "Revalidation got no response; serving cached copy, page may be stale"
            );
            return cached;
        }
    };

    let headers = response::parse_headers(&raw);
    let body = response::parse_body(&raw);
    if body.is_empty() {
        // A 304 without a body lands here as well; either way the
        // cached copy is served and the store stays as it was.
        warn!(
            target: "hoard::worker",
            host = %key.host,
            path = %key.path,
            "Revalidation inconclusive; serving cached copy, page may be stale"
        );
        return cached;
    }

    let updated = CacheEntry::new(
        &cached.host,
        &cached.path,
        body,
        &headers.date,
        &headers.last_modified,
        &headers.expires,
    );
    cache.insert(key, updated.clone());
    debug!(target: "hoard::worker", "Cache entry refreshed from origin");
    updated
}

//! Accept loop.

use std::sync::Arc;

use hoard_cache::PageCache;
use hoard_config::ProxyConfig;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

use crate::worker::handle_connection;

/// The proxy server: one listener, one shared page cache, one task
/// per accepted connection.
pub struct Server {
    cfg: Arc<ProxyConfig>,
    cache: Arc<PageCache>,
}

impl Server {
    pub fn new(cfg: ProxyConfig) -> Self {
        let cache = Arc::new(PageCache::new(cfg.cache_capacity));
        Self {
            cfg: Arc::new(cfg),
            cache,
        }
    }

    /// Binds the listener and serves clients until the process is
    /// killed. Bind failure is the only fatal error; everything that
    /// goes wrong on an individual connection is contained to it.
    #[instrument(skip(self), fields(listen = %self.cfg.listen_addr()))]
    pub async fn run(self) -> anyhow::Result<()> {
        let listen_addr = self.cfg.listen_addr();
        let listener = match TcpListener::bind(listen_addr).await {
            Ok(l) => {
                info!(
                    target: "hoard::server",
                    listen = %listen_addr,
                    "Bind successful; listening for incoming connections"
                );
                l
            }
            Err(e) => {
                error!(
                    target: "hoard::server",
                    listen = %listen_addr,
                    error = ?e,
                    "Failed to bind listener"
                );
                return Err(e.into());
            }
        };

        // Bounds how many client connections are in flight at once.
        let semaphore = Arc::new(Semaphore::new(self.cfg.max_connections));

        loop {
            let (stream, client_addr) = match listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(
                        target: "hoard::server",
                        error = ?e,
                        "Failed to accept client connection"
                    );
                    continue;
                }
            };

            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                // The semaphore is never closed; keep the compiler honest.
                continue;
            };

            info!(target: "hoard::server", client = %client_addr, "Accepted client connection");

            let cache = self.cache.clone();
            let cfg = self.cfg.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, client_addr, cache, cfg).await {
                    warn!(
                        target: "hoard::worker",
                        client = %client_addr,
                        error = ?e,
                        "Client connection ended with an error"
                    );
                }
                drop(permit);
            });
        }
    }
}

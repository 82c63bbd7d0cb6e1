use hoard_config::ProxyConfig;
use hoard_core::server::Server;
use utils::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cfg = match ProxyConfig::from_args(std::env::args()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("hoard: {e}");
            eprintln!("usage: hoard <bind-ip> <bind-port>");
            std::process::exit(1);
        }
    };

    let server = Server::new(cfg);
    server.run().await
}

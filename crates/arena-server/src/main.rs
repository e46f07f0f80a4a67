//! TCP server binary for staked chess match sessions.

use arena_server::config::Config;
use arena_server::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        bind = %config.bind_addr,
        port = config.port,
        max_clients = config.max_clients,
        "starting arena-server"
    );

    server::run(config).await
}

use anyhow::Result;
use evco::{
    config::{ServerConfig, DEFAULT_FRONTEND_PORT},
    startup::{frontend_router, init_tracing, serve},
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ServerConfig::from_env("FRONTEND", DEFAULT_FRONTEND_PORT)?;

    tracing::info!("Starting frontend v{}", env!("CARGO_PKG_VERSION"));
    serve("Frontend", &config, frontend_router()).await
}

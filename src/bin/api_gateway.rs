use anyhow::Result;
use evco::{
    config::GatewayConfig,
    startup::{build_gateway, init_tracing, serve},
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = GatewayConfig::from_env()?;

    tracing::info!("Starting API Gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {:?}", config.server.environment);

    let app = build_gateway(&config)?;
    serve("API Gateway", &config.server, app).await
}

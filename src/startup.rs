use crate::{
    config::{GatewayConfig, ServerConfig},
    handlers::*,
    middleware::request_logging,
    models::ServiceKind,
    services::UpstreamClient,
};
use anyhow::{Context, Result};
use axum::{middleware as axum_middleware, routing::{any, get}, Router};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so tests and binaries can both call this
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Layers shared by every HTTP process. The request-id middleware is the
/// outermost layer so the trace span already sees `x-request-id`.
fn with_common_layers(router: Router) -> Router {
    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn(request_logging))
}

pub fn service_router(service: ServiceKind) -> Router {
    let state = ServiceState::new(service);

    let router = Router::new()
        .route("/", get(service_root))
        .route("/health", get(service_health))
        .fallback(not_found)
        .with_state(state);

    with_common_layers(router)
}

pub fn gateway_router(upstream: Arc<UpstreamClient>) -> Router {
    let state = GatewayState::new(upstream);

    let router = Router::new()
        .route("/", get(gateway_root))
        .route("/health", get(gateway_health))
        .route("/api/:service", any(forward_to_service))
        .route("/api/:service/*path", any(forward_to_service))
        .fallback(forward_to_service)
        .with_state(state);

    with_common_layers(router)
}

pub fn frontend_router() -> Router {
    let router = Router::new()
        .route(HOME.path, get(home_page))
        .route(BOOKING.path, get(booking_page))
        .route(COST.path, get(cost_page))
        .route(GROUP.path, get(group_page))
        .route(VEHICLE.path, get(vehicle_page))
        .fallback(page_not_found);

    with_common_layers(router)
}

pub fn build_gateway(config: &GatewayConfig) -> Result<Router> {
    let upstream = UpstreamClient::new(config.upstreams.clone(), config.upstream_timeout)?;
    Ok(gateway_router(Arc::new(upstream)))
}

/// Binds the configured address and serves `app` until Ctrl-C.
pub async fn serve(name: &str, server: &ServerConfig, app: Router) -> Result<()> {
    let addr = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("{} listening on http://{}", name, addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Entry point shared by the six greeting service binaries.
pub async fn run_service(service: ServiceKind) -> Result<()> {
    init_tracing();

    let config = crate::config::ServiceConfig::from_env(service)?;

    tracing::info!(
        "Starting {} Service v{}",
        service.display_name(),
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {:?}", config.server.environment);

    let name = format!("{} Service", service.display_name());
    serve(&name, &config.server, service_router(service)).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
    }
    tracing::info!("Shutting down gracefully...");
}

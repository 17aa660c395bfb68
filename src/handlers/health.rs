use crate::{
    handlers::{GatewayState, ServiceState},
    models::HealthStatus,
};
use axum::{extract::State, Json};
use chrono::Utc;
use futures::future::join_all;
use std::collections::BTreeMap;

pub async fn service_health(State(state): State<ServiceState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: state.service.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
        upstreams: None,
    })
}

pub async fn gateway_health(State(state): State<GatewayState>) -> Json<HealthStatus> {
    let kinds: Vec<_> = state.upstream.services().collect();
    let results = join_all(kinds.iter().map(|kind| state.upstream.is_reachable(*kind))).await;
    let upstreams: BTreeMap<String, bool> = kinds
        .iter()
        .map(|kind| kind.to_string())
        .zip(results)
        .collect();

    let reachable = upstreams.values().filter(|ok| **ok).count();
    let status = gateway_status(reachable, upstreams.len());

    Json(HealthStatus {
        status: status.to_string(),
        service: "gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
        upstreams: Some(upstreams),
    })
}

/// A gateway with nothing to forward to cannot serve anything.
fn gateway_status(reachable: usize, configured: usize) -> &'static str {
    if configured == 0 || reachable == 0 {
        "unhealthy"
    } else if reachable == configured {
        "healthy"
    } else {
        "degraded"
    }
}

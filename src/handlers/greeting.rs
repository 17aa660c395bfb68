use crate::{error::EvcoError, models::{ServiceKind, ServiceMessage}};
use axum::{extract::State, http::Uri, Json};
use std::time::Instant;

#[derive(Clone)]
pub struct ServiceState {
    pub service: ServiceKind,
    pub started_at: Instant,
}

impl ServiceState {
    pub fn new(service: ServiceKind) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

pub async fn service_root(State(state): State<ServiceState>) -> Json<ServiceMessage> {
    Json(ServiceMessage::new(state.service.greeting()))
}

pub async fn gateway_root() -> Json<ServiceMessage> {
    Json(ServiceMessage::new("API Gateway running"))
}

pub async fn not_found(uri: Uri) -> EvcoError {
    EvcoError::RouteNotFound(uri.path().to_string())
}

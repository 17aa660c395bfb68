use crate::{
    error::EvcoError,
    middleware::RequestId,
    models::ServiceKind,
    services::{ForwardRequest, UpstreamClient},
};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Extension,
};
use std::sync::Arc;
use std::time::Instant;

const API_PREFIX: &str = "/api/";

#[derive(Clone)]
pub struct GatewayState {
    pub upstream: Arc<UpstreamClient>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(upstream: Arc<UpstreamClient>) -> Self {
        Self {
            upstream,
            started_at: Instant::now(),
        }
    }
}

/// `ANY /api/:service[/*path]`, also mounted as the gateway fallback so
/// `/api/:service/` is forwarded too. Paths outside `/api/` are 404s.
pub async fn forward_to_service(
    State(state): State<GatewayState>,
    request_id: Option<Extension<RequestId>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, EvcoError> {
    // Work on the raw path so percent-encoded segments reach the upstream as sent
    let (slug, rest) =
        split_api_path(uri.path()).ok_or_else(|| EvcoError::RouteNotFound(uri.path().to_string()))?;
    let kind: ServiceKind = slug
        .parse()
        .map_err(|_| EvcoError::ServiceNotFound(slug.to_string()))?;

    let request = ForwardRequest {
        method: method.to_string(),
        path_and_query: upstream_path(rest, uri.query()),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
        request_id: request_id.map(|Extension(id)| id.as_str().to_string()),
        body: body.to_vec(),
    };

    let forwarded = state.upstream.forward(kind, request).await?;

    tracing::info!(
        service = %kind,
        status = forwarded.status,
        "Forwarded {} {}",
        method,
        uri.path()
    );

    let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = forwarded.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder
        .body(Body::from(forwarded.body))
        .map_err(|e| EvcoError::InternalError(format!("Failed to build response: {}", e)))
}

/// Splits `/api/<slug>/<rest>` into `(slug, rest)`; `rest` keeps its encoding.
fn split_api_path(path: &str) -> Option<(&str, &str)> {
    let tail = path.strip_prefix(API_PREFIX)?;
    let (slug, rest) = match tail.split_once('/') {
        Some((slug, rest)) => (slug, rest),
        None => (tail, ""),
    };

    if slug.is_empty() {
        return None;
    }
    Some((slug, rest))
}

fn upstream_path(rest: &str, query: Option<&str>) -> String {
    let mut path = format!("/{}", rest.trim_start_matches('/'));
    if let Some(query) = query {
        path.push('?');
        path.push_str(query);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_path_keeps_query() {
        assert_eq!(upstream_path("", None), "/");
        assert_eq!(upstream_path("bookings/1", None), "/bookings/1");
        assert_eq!(upstream_path("bookings", Some("page=2")), "/bookings?page=2");
    }

    #[test]
    fn split_keeps_percent_encoding() {
        assert_eq!(
            split_api_path("/api/user/files/a%3Fb"),
            Some(("user", "files/a%3Fb"))
        );
        assert_eq!(split_api_path("/api/user/a%2Fb"), Some(("user", "a%2Fb")));
    }

    #[test]
    fn split_handles_bare_and_trailing_slash() {
        assert_eq!(split_api_path("/api/vehicle"), Some(("vehicle", "")));
        assert_eq!(split_api_path("/api/vehicle/"), Some(("vehicle", "")));
        assert_eq!(split_api_path("/api/"), None);
        assert_eq!(split_api_path("/health/x"), None);
    }
}

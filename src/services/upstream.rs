use crate::{error::EvcoError, middleware::REQUEST_ID_HEADER, models::ServiceKind};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: String,
    // Starts with `/`, query included
    pub path_and_query: String,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ForwardResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

pub struct UpstreamClient {
    client: reqwest::Client,
    upstreams: HashMap<ServiceKind, String>,
}

impl UpstreamClient {
    pub fn new(upstreams: HashMap<ServiceKind, String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;

        for (kind, url) in &upstreams {
            tracing::info!("Upstream {} -> {}", kind, url);
        }

        Ok(Self { client, upstreams })
    }

    pub fn base_url(&self, kind: ServiceKind) -> Option<&str> {
        self.upstreams.get(&kind).map(String::as_str)
    }

    pub async fn forward(
        &self,
        kind: ServiceKind,
        request: ForwardRequest,
    ) -> Result<ForwardResponse, EvcoError> {
        let base = self
            .base_url(kind)
            .ok_or_else(|| EvcoError::ServiceNotFound(kind.to_string()))?;
        let url = format!("{}{}", base, request.path_and_query);

        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| EvcoError::InternalError(format!("Invalid method: {}", e)))?;

        let mut builder = self.client.request(method, &url);
        if let Some(content_type) = &request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(request_id) = &request.request_id {
            builder = builder.header(REQUEST_ID_HEADER, request_id);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        tracing::debug!("Forwarding {} {} to {}", request.method, request.path_and_query, kind);

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(ForwardResponse {
            status,
            content_type,
            body,
        })
    }

    pub async fn is_reachable(&self, kind: ServiceKind) -> bool {
        let Some(base) = self.base_url(kind) else {
            return false;
        };

        match self.client.get(format!("{}/", base)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Upstream {} unreachable: {}", kind, e);
                false
            }
        }
    }

    pub fn services(&self) -> impl Iterator<Item = ServiceKind> + '_ {
        self.upstreams.keys().copied()
    }
}

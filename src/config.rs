use crate::models::ServiceKind;
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Listener settings shared by every HTTP process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads `HOST` and the port from `<prefix>_PORT`, then `PORT`, then
    /// `default_port`.
    pub fn from_env(port_prefix: &str, default_port: u16) -> Result<Self> {
        dotenvy::dotenv().ok();

        let port_var = format!("{}_PORT", port_prefix);
        let port = resolve_port(
            &port_var,
            std::env::var(&port_var).ok(),
            std::env::var("PORT").ok(),
            default_port,
        )?;

        let config = Self {
            environment: parse_environment()?,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("HOST must not be empty");
        }

        tracing::info!(
            "Configuration validated for {:?} environment",
            self.environment
        );

        Ok(())
    }
}

/// Settings for one of the greeting services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service: ServiceKind,
    pub server: ServerConfig,
}

impl ServiceConfig {
    pub fn from_env(service: ServiceKind) -> Result<Self> {
        let server = ServerConfig::from_env(&service.env_prefix(), service.default_port())?;
        Ok(Self { service, server })
    }
}

pub const DEFAULT_GATEWAY_PORT: u16 = 3000;
pub const DEFAULT_FRONTEND_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub upstreams: HashMap<ServiceKind, String>,
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig::from_env("GATEWAY", DEFAULT_GATEWAY_PORT)?;

        let mut upstreams = HashMap::new();
        for kind in ServiceKind::ALL {
            let var = format!("{}_URL", kind.env_prefix());
            let url = std::env::var(&var)
                .unwrap_or_else(|_| format!("http://127.0.0.1:{}", kind.default_port()));
            upstreams.insert(kind, url.trim_end_matches('/').to_string());
        }

        let timeout_secs: u64 = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("Invalid UPSTREAM_TIMEOUT_SECS")?;

        let config = Self {
            server,
            upstreams,
            upstream_timeout: Duration::from_secs(timeout_secs),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (kind, url) in &self.upstreams {
            if !url.starts_with("http") {
                bail!("{}_URL must be HTTP(S) URL", kind.env_prefix());
            }
        }
        if self.upstream_timeout.is_zero() {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            url: std::env::var("DATABASE_URL").context("DATABASE_URL required")?,
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
        };

        if !config.url.starts_with("postgres") {
            bail!("DATABASE_URL must be a postgres:// URL");
        }

        Ok(config)
    }
}

fn resolve_port(
    port_var: &str,
    specific: Option<String>,
    generic: Option<String>,
    default_port: u16,
) -> Result<u16> {
    match specific.or(generic) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} / PORT: {}", port_var, raw)),
        None => Ok(default_port),
    }
}

fn parse_environment() -> Result<Environment> {
    let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    parse_environment_name(&env)
}

fn parse_environment_name(env: &str) -> Result<Environment> {
    match env.to_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "staging" | "test" => Ok(Environment::Staging),
        "production" | "prod" => Ok(Environment::Production),
        _ => bail!("Unknown environment: {}", env),
    }
}

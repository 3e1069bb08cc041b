use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub logs: LogConfig,
    pub vendors: VendorConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// `SurrealDB` connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub credentials: Option<DatabaseCredentials>,
}

/// `SurrealDB` root credentials (optional when using unauthenticated engines like mem://).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

/// Log sink configuration. Console output is always on; a path enables the
/// rolling file appender.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub path: Option<PathBuf>,
    pub json: bool,
}

/// API security knobs.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt: JwtConfig,
}

/// Bearer-token validation settings for inbound requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: Option<String>,
    pub ttl_seconds: u64,
    pub clock_skew_seconds: u64,
}

/// Third-party REST endpoints and credentials. Tokens arrive via config or
/// `BRIGADE__VENDORS__*` environment overrides; there is no OAuth dance here.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    pub stripe: StripeConfig,
    pub square: WebhookVendorConfig,
    pub toast: WebhookVendorConfig,
    pub clover: WebhookVendorConfig,
    pub gusto: GustoConfig,
    pub openrouter: ModelConfig,
    pub huggingface: ModelConfig,
    pub resend: ResendConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StripeConfig {
    pub base_url: String,
    pub secret_key: String,
}

/// Shared shape for POS vendors we only receive webhooks from.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookVendorConfig {
    pub webhook_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GustoConfig {
    pub base_url: String,
    pub api_token: String,
    pub company_id: String,
}

/// One AI inference endpoint (OpenRouter primary, HuggingFace fallback).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResendConfig {
    pub base_url: String,
    pub api_key: String,
    pub from: String,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4710, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mem://".to_owned(),
            namespace: "brigade".to_owned(),
            database: "core".to_owned(),
            credentials: Some(DatabaseCredentials::default()),
        }
    }
}

impl Default for DatabaseCredentials {
    fn default() -> Self {
        Self { username: "root".to_owned(), password: "root".to_owned() }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "dev-only-change-me".to_owned(),
            issuer: "brigade".to_owned(),
            audience: None,
            ttl_seconds: 3600,
            clock_skew_seconds: 60,
        }
    }
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self { base_url: "https://api.stripe.com/v1".to_owned(), secret_key: String::new() }
    }
}

impl Default for GustoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gusto.com/v1".to_owned(),
            api_token: String::new(),
            company_id: String::new(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { base_url: String::new(), api_key: String::new(), model: String::new() }
    }
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.resend.com".to_owned(),
            api_key: String::new(),
            from: "reports@brigade.example".to_owned(),
        }
    }
}

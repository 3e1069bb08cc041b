//! Insights feature slice.
//!
//! Turns a period's P&L into a short plain-language digest: OpenRouter chat
//! completions first (with exponential backoff on rate limits), HuggingFace
//! inference once as a fallback, Resend for optional email dispatch.

pub mod client;
mod handlers;
pub mod models;
pub mod prompt;
pub mod service;

pub use handlers::router;
pub use service::Mailer;

use brigade_connect::RestClient;
use brigade_domain::config::{ApiConfig, ModelConfig};
use brigade_domain::registry::{FeatureSlice, InitializedSlice};
use brigade_kernel::envelope::ApiError;
use client::{ChatClient, InferenceClient};

/// Insights feature state: whichever AI endpoints and mailer are configured.
#[derive(Debug)]
pub struct Insights {
    openrouter: Option<ChatClient>,
    huggingface: Option<InferenceClient>,
    mailer: Option<Mailer>,
}

impl Insights {
    #[must_use]
    pub const fn openrouter(&self) -> Option<&ChatClient> {
        self.openrouter.as_ref()
    }

    #[must_use]
    pub const fn huggingface(&self) -> Option<&InferenceClient> {
        self.huggingface.as_ref()
    }

    #[must_use]
    pub const fn mailer(&self) -> Option<&Mailer> {
        self.mailer.as_ref()
    }
}

impl FeatureSlice for Insights {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn name(&self) -> &'static str {
        "insights"
    }
}

fn model_client(service: &'static str, config: &ModelConfig) -> Result<Option<RestClient>, ApiError> {
    if config.base_url.is_empty() || config.api_key.is_empty() || config.model.is_empty() {
        tracing::warn!(service, "AI endpoint is not configured");
        return Ok(None);
    }

    Ok(Some(
        RestClient::builder(service, config.base_url.clone()).bearer(config.api_key.clone()).build()?,
    ))
}

/// Initialize the insights feature from the vendor config tree. Each
/// endpoint is optional; generation fails at request time when none is set.
///
/// # Errors
/// [`ApiError::Vendor`] when a configured endpoint is malformed.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, ApiError> {
    let vendors = &config.vendors;

    let openrouter = model_client("openrouter", &vendors.openrouter)?
        .map(|client| ChatClient { client, model: vendors.openrouter.model.clone() });
    let huggingface = model_client("huggingface", &vendors.huggingface)?
        .map(|client| InferenceClient { client, model: vendors.huggingface.model.clone() });

    let mailer = if vendors.resend.api_key.is_empty() {
        tracing::warn!("Resend is not configured; insight email disabled");
        None
    } else {
        Some(Mailer {
            client: RestClient::builder("resend", vendors.resend.base_url.clone())
                .bearer(vendors.resend.api_key.clone())
                .build()?,
            from: vendors.resend.from.clone(),
        })
    };

    tracing::info!("Insights slice initialized");
    Ok(InitializedSlice::new(Insights { openrouter, huggingface, mailer }))
}

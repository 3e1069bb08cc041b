//! Billing feature slice.
//!
//! The Stripe subscription is cached locally, one row per restaurant, and
//! refreshed on demand through `POST /billing/sync`. Plan tiers carry the
//! location allowances used for gating.

mod handlers;
pub mod models;
pub mod service;

pub use handlers::router;

use brigade_connect::RestClient;
use brigade_domain::config::ApiConfig;
use brigade_domain::registry::{FeatureSlice, InitializedSlice};
use brigade_kernel::envelope::ApiError;

/// Billing feature state.
#[derive(Debug)]
pub struct Billing {
    stripe: Option<RestClient>,
}

impl Billing {
    /// The Stripe client, when a secret key is configured.
    #[must_use]
    pub const fn stripe(&self) -> Option<&RestClient> {
        self.stripe.as_ref()
    }
}

impl FeatureSlice for Billing {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn name(&self) -> &'static str {
        "billing"
    }
}

/// Initialize the billing feature. Stripe stays off until a secret key is
/// configured.
///
/// # Errors
/// [`ApiError::Vendor`] when the configured Stripe endpoint is malformed.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, ApiError> {
    let stripe_config = &config.vendors.stripe;
    let stripe = if stripe_config.secret_key.is_empty() {
        tracing::warn!("Stripe is not configured; billing sync disabled");
        None
    } else {
        Some(
            RestClient::builder("stripe", stripe_config.base_url.clone())
                .bearer(stripe_config.secret_key.clone())
                .build()?,
        )
    };

    tracing::info!("Billing slice initialized");
    Ok(InitializedSlice::new(Billing { stripe }))
}

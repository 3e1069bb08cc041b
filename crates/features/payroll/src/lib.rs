//! Payroll feature slice.
//!
//! Pay periods are the scheduling slice's Monday-to-Monday weeks; worked
//! time comes from completed clock punches and splits into regular and
//! overtime minutes at forty hours. Export persists a timesheet row per
//! employee, then submits the period to Gusto.

mod handlers;
pub mod models;
pub mod service;

pub use handlers::router;

use brigade_connect::RestClient;
use brigade_domain::config::ApiConfig;
use brigade_domain::registry::{FeatureSlice, InitializedSlice};
use brigade_kernel::envelope::ApiError;

/// Gusto REST client plus the company every payroll posts under.
#[derive(Debug, Clone)]
pub struct GustoClient {
    pub client: RestClient,
    pub company_id: String,
}

/// Payroll feature state.
#[derive(Debug)]
pub struct Payroll {
    gusto: Option<GustoClient>,
}

impl Payroll {
    /// The Gusto client, when the vendor is configured.
    #[must_use]
    pub const fn gusto(&self) -> Option<&GustoClient> {
        self.gusto.as_ref()
    }
}

impl FeatureSlice for Payroll {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn name(&self) -> &'static str {
        "payroll"
    }
}

/// Initialize the payroll feature. Gusto stays off until both an API token
/// and a company id are configured.
///
/// # Errors
/// [`ApiError::Vendor`] when the configured Gusto endpoint is malformed.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, ApiError> {
    let gusto_config = &config.vendors.gusto;
    let gusto = if gusto_config.api_token.is_empty() || gusto_config.company_id.is_empty() {
        tracing::warn!("Gusto is not configured; payroll export disabled");
        None
    } else {
        let client = RestClient::builder("gusto", gusto_config.base_url.clone())
            .bearer(gusto_config.api_token.clone())
            .build()?;
        Some(GustoClient { client, company_id: gusto_config.company_id.clone() })
    };

    tracing::info!("Payroll slice initialized");
    Ok(InitializedSlice::new(Payroll { gusto }))
}

//! POS feature slice: webhook ingestion for Square, Toast and Clover.
//!
//! Webhooks carry no user token; authenticity rests on a per-vendor shared
//! secret header. Ingested payments land in the `unified_sale` table and
//! each ingest publishes recomputed day totals as a `SalesSynced` event.

mod handlers;
pub mod models;
pub mod normalize;
pub mod service;

pub use handlers::{WEBHOOK_SECRET_HEADER, router};

use brigade_domain::config::ApiConfig;
use brigade_domain::registry::{FeatureSlice, InitializedSlice};
use brigade_domain::vendor::PosVendor;
use brigade_kernel::envelope::ApiError;
use fxhash::FxHashMap;

/// POS feature state: the per-vendor webhook secrets.
#[derive(Debug)]
pub struct Pos {
    secrets: FxHashMap<PosVendor, String>,
}

impl Pos {
    /// Checks the shared secret for one vendor. A vendor with no configured
    /// secret rejects everything rather than accepting everything.
    ///
    /// # Errors
    /// [`ApiError::Unauthorized`] on a missing, unconfigured or wrong secret.
    pub fn verify_secret(
        &self,
        vendor: PosVendor,
        provided: Option<&str>,
    ) -> Result<(), ApiError> {
        let expected = self.secrets.get(&vendor).filter(|secret| !secret.is_empty());
        let Some(expected) = expected else {
            return Err(ApiError::Unauthorized(format!("{vendor} webhooks are not configured")));
        };

        match provided {
            Some(secret) if secret == expected => Ok(()),
            _ => Err(ApiError::Unauthorized(format!("bad {vendor} webhook secret"))),
        }
    }
}

impl FeatureSlice for Pos {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn name(&self) -> &'static str {
        "pos"
    }
}

/// Initialize the POS feature from the vendor config tree.
///
/// # Errors
/// Infallible today; kept fallible for parity with the other slices.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, ApiError> {
    let vendors = &config.vendors;
    let secrets = FxHashMap::from_iter([
        (PosVendor::Square, vendors.square.webhook_secret.clone()),
        (PosVendor::Toast, vendors.toast.webhook_secret.clone()),
        (PosVendor::Clover, vendors.clover.webhook_secret.clone()),
    ]);

    tracing::info!("POS slice initialized");
    Ok(InitializedSlice::new(Pos { secrets }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice() -> Pos {
        Pos {
            secrets: FxHashMap::from_iter([
                (PosVendor::Square, "sq-secret".to_owned()),
                (PosVendor::Toast, String::new()),
            ]),
        }
    }

    #[test]
    fn accepts_matching_secret() {
        assert!(slice().verify_secret(PosVendor::Square, Some("sq-secret")).is_ok());
    }

    #[test]
    fn rejects_wrong_or_missing_secret() {
        let pos = slice();
        assert!(pos.verify_secret(PosVendor::Square, Some("nope")).is_err());
        assert!(pos.verify_secret(PosVendor::Square, None).is_err());
    }

    #[test]
    fn unconfigured_vendor_rejects_everything() {
        let pos = slice();
        assert!(pos.verify_secret(PosVendor::Toast, Some("")).is_err());
        assert!(pos.verify_secret(PosVendor::Clover, Some("anything")).is_err());
    }
}

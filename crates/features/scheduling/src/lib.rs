//! Scheduling feature slice: shifts, week views and clock punches.
//!
//! Worked time derived here ([`service::worked_minutes`]) feeds the payroll
//! slice's timesheets.

mod handlers;
pub mod models;
pub mod service;

pub use handlers::router;

use brigade_domain::registry::{FeatureSlice, InitializedSlice};

/// Scheduling feature state. Stateless today; the slice registers so routes
/// and diagnostics can find it.
#[derive(Debug)]
pub struct Scheduling {}

impl FeatureSlice for Scheduling {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn name(&self) -> &'static str {
        "scheduling"
    }
}

/// Initialize the scheduling feature.
///
/// # Errors
/// Infallible today; kept fallible for parity with the other slices.
pub fn init() -> Result<InitializedSlice, brigade_kernel::envelope::ApiError> {
    tracing::info!("Scheduling slice initialized");
    Ok(InitializedSlice::new(Scheduling {}))
}

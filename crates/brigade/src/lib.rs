//! Facade crate for Brigade features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] to register every feature slice; extend as new slices appear.
//! - Mount each feature's router next to `server::router::system_router`.

use brigade_database::Database;
pub use brigade_domain as domain;
use brigade_domain::config::ApiConfig;
use brigade_events::EventBus;
pub use brigade_kernel as kernel;

pub mod server {
    pub mod router {
        pub use brigade_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use brigade_billing as billing;
    pub use brigade_identity as identity;
    pub use brigade_insights as insights;
    pub use brigade_ledger as ledger;
    pub use brigade_payroll as payroll;
    pub use brigade_pos as pos;
    pub use brigade_scheduling as scheduling;

    pub const ENABLED: &[&str] = &[
        "identity",
        "scheduling",
        "ledger",
        "pos",
        "payroll",
        "billing",
        "insights",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    database: &Database,
    events: &EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::new();

    // Identity & Access Management (IAM)
    slices.push(features::identity::init(config)?);

    // Scheduling
    slices.push(features::scheduling::init()?);

    // Ledger (subscribes to POS sales events)
    slices.push(features::ledger::init(database, events)?);

    // POS ingestion
    slices.push(features::pos::init(config)?);

    // Payroll
    slices.push(features::payroll::init(config)?);

    // Billing
    slices.push(features::billing::init(config)?);

    // Insights
    slices.push(features::insights::init(config)?);

    Ok(slices)
}

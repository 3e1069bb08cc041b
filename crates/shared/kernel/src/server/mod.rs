mod health;
pub mod router;
mod state;

pub use state::{ApiState, ApiStateBuilder, ApiStateError};

/// OpenAPI tag for system endpoints.
pub const SYSTEM_TAG: &str = "System";

//! Identity feature slice: inbound bearer JWT validation and role checks.
//!
//! Other slices depend on two things from here: the [`AuthUser`] extractor
//! (authentication) and [`require_role`] (authorization against the `member`
//! join table). There are no routes of its own.

mod error;
mod extract;
mod member;
mod token;

pub use error::IdentityError;
pub use extract::AuthUser;
pub use member::{Member, require_role};
pub use token::{Claims, TokenVerifier};

use brigade_domain::config::ApiConfig;
use brigade_domain::registry::{FeatureSlice, InitializedSlice};

/// Identity feature state: the shared token verifier.
#[derive(Debug)]
pub struct Identity {
    verifier: TokenVerifier,
}

impl Identity {
    #[must_use]
    pub const fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }
}

impl FeatureSlice for Identity {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

/// Initialize the identity feature.
///
/// # Errors
/// Returns [`IdentityError::Config`] when the JWT section is unusable.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, IdentityError> {
    let verifier = TokenVerifier::from_config(&config.security.jwt)?;

    tracing::info!("Identity slice initialized");

    Ok(InitializedSlice::new(Identity { verifier }))
}

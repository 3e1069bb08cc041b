use brigade_kernel::envelope::ApiError;

/// A specialized [`IdentityError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Configuration errors for identity/authentication.
    #[error("Identity config error: {0}")]
    Config(String),

    /// The bearer token is missing, malformed, expired or rejected.
    #[error("Token rejected: {0}")]
    Token(String),

    /// The caller is authenticated but lacks the required role.
    #[error("Requires {required} role at {restaurant}")]
    Privilege { required: &'static str, restaurant: String },
}

impl From<IdentityError> for ApiError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Config(message) => Self::Internal(message),
            IdentityError::Token(message) => Self::Unauthorized(message),
            IdentityError::Privilege { .. } => Self::Forbidden(error.to_string()),
        }
    }
}

use crate::Identity;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use brigade_kernel::envelope::ApiError;
use brigade_kernel::server::ApiState;

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Handlers take this as an argument; extraction fails with 401 before the
/// handler body runs when the token is absent or invalid.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User record key (`user:{id}` without the table prefix).
    pub id: String,
}

impl FromRequestParts<ApiState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_owned()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_owned()))?;

        let identity = state
            .try_get_slice::<Identity>()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let claims = identity.verifier().verify(token)?;

        Ok(Self { id: claims.sub })
    }
}

use crate::error::IdentityError;
use brigade_domain::config::JwtConfig;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims carried by inbound bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User record key (the `user:{sub}` record in the database).
    pub sub: String,
    pub iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: i64,
}

/// Validates HS256 bearer tokens against the configured secret and issuer.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").field("validation", &self.validation).finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Builds a verifier from the JWT section of the config tree.
    ///
    /// # Errors
    /// Returns [`IdentityError::Config`] when the secret or issuer is empty.
    pub fn from_config(cfg: &JwtConfig) -> Result<Self, IdentityError> {
        if cfg.secret.is_empty() {
            return Err(IdentityError::Config("JWT secret is empty".to_owned()));
        }
        if cfg.issuer.is_empty() {
            return Err(IdentityError::Config("JWT issuer is empty".to_owned()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = cfg.clock_skew_seconds;
        validation.set_issuer(&[&cfg.issuer]);
        match &cfg.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key: DecodingKey::from_secret(cfg.secret.as_bytes()), validation })
    }

    /// Decodes and validates a bearer token, returning its claims.
    ///
    /// # Errors
    /// Returns [`IdentityError::Token`] for any signature, expiry or claim
    /// mismatch; the detail stays out of the response body.
    pub fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| IdentityError::Token(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(IdentityError::Token("empty subject".to_owned()));
        }

        Ok(data.claims)
    }
}

//! The JSON envelope every handler speaks.
//!
//! Success: `{"success": true, "data": …}`. Failure: `{"success": false,
//! "error": "…"}` with a mapped HTTP status. Vendors' upstream failures map
//! to 502 so callers can tell our faults from theirs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use brigade_connect::ConnectError;
use brigade_database::DatabaseError;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};
use utoipa::ToSchema;

/// Successful response envelope.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Wraps a payload in the success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}

/// The error side of the envelope, shared by every handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream vendor failure: {0}")]
    Vendor(#[from] ConnectError),

    #[error("Database failure: {0}")]
    Database(#[from] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<brigade_database::surrealdb::Error> for ApiError {
    fn from(error: brigade_database::surrealdb::Error) -> Self {
        Self::Database(error.into())
    }
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Vendor(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the logs; the body carries the summary.
        if status.is_server_error() {
            error!(%status, error = %self, "Request failed");
        } else {
            warn!(%status, error = %self, "Request rejected");
        }

        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn vendor_errors_map_to_bad_gateway() {
        let upstream = brigade_connect::ConnectError::Status {
            service: "stripe".into(),
            status: 500,
            body: String::new(),
        };
        assert_eq!(ApiError::from(upstream).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn success_envelope_shape() {
        let Json(envelope) = ok(json!({ "id": "abc" }));
        assert!(envelope.success);
        assert_eq!(envelope.data["id"], "abc");
    }
}

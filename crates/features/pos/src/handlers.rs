use crate::models::{DailyQuery, DailySales, WebhookAck, WebhookQuery};
use crate::normalize::normalize;
use crate::{Pos, service};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use brigade_domain::role::Role;
use brigade_domain::vendor::PosVendor;
use brigade_identity::{AuthUser, require_role};
use brigade_kernel::envelope::{ApiError, ok};
use brigade_kernel::server::ApiState;
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const TAG: &str = "POS";

/// Header carrying the per-vendor shared secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

#[utoipa::path(
    post,
    path = "/webhooks/{vendor}",
    params(WebhookQuery),
    request_body = Value,
    responses((status = OK, body = WebhookAck)),
    tag = TAG,
)]
async fn vendor_webhook(
    State(state): State<ApiState>,
    Path(vendor): Path<String>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor: PosVendor =
        vendor.parse().map_err(|e: brigade_domain::vendor::UnknownVendor| {
            ApiError::NotFound(e.to_string())
        })?;

    let pos = state.try_get_slice::<Pos>().map_err(|e| ApiError::Internal(e.to_string()))?;
    let provided = headers.get(WEBHOOK_SECRET_HEADER).and_then(|v| v.to_str().ok());
    pos.verify_secret(vendor, provided)?;

    let order = normalize(vendor, &payload)?;
    service::ingest(&state.database, &state.events, &query.restaurant, &order).await?;

    Ok(ok(WebhookAck { received: order.external_id }))
}

#[utoipa::path(
    get,
    path = "/sales/daily",
    params(DailyQuery),
    responses((status = OK, body = DailySales)),
    tag = TAG,
)]
async fn daily_sales(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<DailyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;
    let summary = service::daily_sales(&state.database, &query.restaurant, query.date).await?;
    Ok(ok(summary))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(vendor_webhook)).routes(routes!(daily_sales))
}

use crate::models::{RestaurantQuery, Subscription, SyncRequest};
use crate::{Billing, service};
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use brigade_domain::role::Role;
use brigade_identity::{AuthUser, require_role};
use brigade_kernel::envelope::{ApiError, ok};
use brigade_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const TAG: &str = "Billing";

#[utoipa::path(
    get,
    path = "/billing/subscription",
    params(RestaurantQuery),
    responses((status = OK, body = Subscription)),
    tag = TAG,
)]
async fn get_subscription(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<RestaurantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;

    let sub = service::cached_subscription(&state.database, &query.restaurant)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("no subscription on file for {}", query.restaurant))
        })?;
    Ok(ok(sub))
}

#[utoipa::path(
    post,
    path = "/billing/sync",
    request_body = SyncRequest,
    responses((status = OK, body = Subscription)),
    tag = TAG,
)]
async fn sync_subscription(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(request): Json<SyncRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &request.restaurant, Role::Owner).await?;

    let billing = state.try_get_slice::<Billing>().map_err(|e| ApiError::Internal(e.to_string()))?;
    let stripe = billing.stripe().ok_or_else(|| {
        brigade_connect::ConnectError::InvalidConfiguration("stripe is not configured".to_owned())
    })?;

    let sub =
        service::sync(&state.database, stripe, &request.restaurant, request.email.as_deref())
            .await?;
    Ok(ok(sub))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(get_subscription)).routes(routes!(sync_subscription))
}

use crate::models::{ClockRequest, CreateShift, RestaurantQuery, Shift, UpdateShift, WeekQuery};
use crate::service;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use brigade_domain::role::Role;
use brigade_identity::{AuthUser, require_role};
use brigade_kernel::envelope::{ApiError, ok};
use brigade_kernel::security::resource::ResourceGuard;
use brigade_kernel::server::ApiState;
use chrono::Utc;
use serde_json::json;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const TAG: &str = "Scheduling";

#[utoipa::path(
    post,
    path = "/shifts",
    request_body = CreateShift,
    responses((status = OK, body = Shift)),
    tag = TAG,
)]
async fn create_shift(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(body): Json<CreateShift>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let shift = service::create(&state.database, body).await?;
    Ok(ok(shift))
}

#[utoipa::path(
    get,
    path = "/shifts",
    params(WeekQuery),
    responses((status = OK, body = [Shift])),
    tag = TAG,
)]
async fn week_shifts(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<WeekQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Staff).await?;
    let shifts = service::week(&state.database, &query.restaurant, query.week).await?;
    Ok(ok(shifts))
}

#[utoipa::path(
    put,
    path = "/shifts/{id}",
    request_body = UpdateShift,
    responses((status = OK, body = Shift)),
    tag = TAG,
)]
async fn update_shift(
    State(state): State<ApiState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateShift>,
) -> Result<impl IntoResponse, ApiError> {
    let key = ResourceGuard::key(&id, "shift")?;
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let shift = service::update(&state.database, &key, body).await?;
    Ok(ok(shift))
}

#[utoipa::path(
    delete,
    path = "/shifts/{id}",
    params(RestaurantQuery),
    responses((status = OK)),
    tag = TAG,
)]
async fn delete_shift(
    State(state): State<ApiState>,
    user: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<RestaurantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let key = ResourceGuard::key(&id, "shift")?;
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;
    service::delete(&state.database, &key, &query.restaurant).await?;
    Ok(ok(json!({ "deleted": format!("shift:{key}") })))
}

#[utoipa::path(
    post,
    path = "/shifts/{id}/clock-in",
    request_body = ClockRequest,
    responses((status = OK, body = Shift)),
    tag = TAG,
)]
async fn clock_in(
    State(state): State<ApiState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ClockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let key = ResourceGuard::key(&id, "shift")?;
    let member = require_role(&state.database, &user, &body.restaurant, Role::Staff).await?;
    let shift = service::clock_in(&state.database, &key, &member, Utc::now()).await?;
    Ok(ok(shift))
}

#[utoipa::path(
    post,
    path = "/shifts/{id}/clock-out",
    request_body = ClockRequest,
    responses((status = OK, body = Shift)),
    tag = TAG,
)]
async fn clock_out(
    State(state): State<ApiState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ClockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let key = ResourceGuard::key(&id, "shift")?;
    let member = require_role(&state.database, &user, &body.restaurant, Role::Staff).await?;
    let shift = service::clock_out(&state.database, &key, &member, Utc::now()).await?;
    Ok(ok(shift))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(create_shift, week_shifts))
        .routes(routes!(update_shift, delete_shift))
        .routes(routes!(clock_in))
        .routes(routes!(clock_out))
}

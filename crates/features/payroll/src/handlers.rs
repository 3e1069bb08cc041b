use crate::models::{ExportReport, ExportRequest, PayPeriod, PeriodQuery};
use crate::{Payroll, service};
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use brigade_domain::role::Role;
use brigade_identity::{AuthUser, require_role};
use brigade_kernel::envelope::{ApiError, ok};
use brigade_kernel::server::ApiState;
use chrono::Utc;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const TAG: &str = "Payroll";

#[utoipa::path(
    get,
    path = "/payroll/periods/current",
    params(PeriodQuery),
    responses((status = OK, body = PayPeriod)),
    tag = TAG,
)]
async fn current_period(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let period = service::current_period(&state.database, &query.restaurant, date).await?;
    Ok(ok(period))
}

#[utoipa::path(
    post,
    path = "/payroll/export",
    request_body = ExportRequest,
    responses((status = OK, body = ExportReport)),
    tag = TAG,
)]
async fn export_payroll(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &request.restaurant, Role::Owner).await?;

    let payroll = state.try_get_slice::<Payroll>().map_err(|e| ApiError::Internal(e.to_string()))?;
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let report =
        service::export(&state.database, payroll.gusto(), &request.restaurant, date).await?;
    Ok(ok(report))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(current_period)).routes(routes!(export_payroll))
}

use crate::models::{EmailReport, EmailRequest, GenerateRequest, Insight, RestaurantQuery};
use crate::{Insights, service};
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use brigade_domain::role::Role;
use brigade_identity::{AuthUser, require_role};
use brigade_kernel::envelope::{ApiError, ok};
use brigade_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const TAG: &str = "Insights";

fn slice(state: &ApiState) -> Result<&Insights, ApiError> {
    state.try_get_slice::<Insights>().map_err(|e| ApiError::Internal(e.to_string()))
}

#[utoipa::path(
    post,
    path = "/insights/generate",
    request_body = GenerateRequest,
    responses((status = OK, body = Insight)),
    tag = TAG,
)]
async fn generate_insight(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &request.restaurant, Role::Manager).await?;

    let insights = slice(&state)?;
    let insight = service::generate(
        &state.database,
        insights.openrouter(),
        insights.huggingface(),
        &request.restaurant,
        request.from,
        request.to,
    )
    .await?;
    Ok(ok(insight))
}

#[utoipa::path(
    get,
    path = "/insights",
    params(RestaurantQuery),
    responses((status = OK, body = [Insight])),
    tag = TAG,
)]
async fn list_insights(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<RestaurantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;
    let insights = service::list(&state.database, &query.restaurant).await?;
    Ok(ok(insights))
}

#[utoipa::path(
    post,
    path = "/insights/email",
    request_body = EmailRequest,
    responses((status = OK, body = EmailReport)),
    tag = TAG,
)]
async fn email_insight(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(request): Json<EmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &request.restaurant, Role::Manager).await?;

    let insights = slice(&state)?;
    let mailer = insights.mailer().ok_or_else(|| {
        brigade_connect::ConnectError::InvalidConfiguration("resend is not configured".to_owned())
    })?;

    let report = service::email(
        &state.database,
        mailer,
        &request.restaurant,
        &request.to,
        request.insight.as_deref(),
    )
    .await?;
    Ok(ok(report))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_insights))
        .routes(routes!(generate_insight))
        .routes(routes!(email_insight))
}

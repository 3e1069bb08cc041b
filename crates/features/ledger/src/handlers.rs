use crate::models::{
    Account, BankTransaction, CategorizedTransaction, CategoryRule, CreateAccount,
    CreateCategoryRule, CreateJournalEntry, CreatePendingOutflow, ImportReport, ImportRequest,
    JournalEntry, PendingOutflow, PnlQuery, PnlReport, ReconcileReport, ReconcileRequest,
    RestaurantQuery,
};
use crate::service;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use brigade_domain::role::Role;
use brigade_identity::{AuthUser, require_role};
use brigade_kernel::envelope::{ApiError, ok};
use brigade_kernel::security::resource::ResourceGuard;
use brigade_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const TAG: &str = "Ledger";

#[utoipa::path(
    get,
    path = "/accounts",
    params(RestaurantQuery),
    responses((status = OK, body = [Account])),
    tag = TAG,
)]
async fn list_accounts(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<RestaurantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;
    let accounts = service::list_accounts(&state.database, &query.restaurant).await?;
    Ok(ok(accounts))
}

#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccount,
    responses((status = OK, body = Account)),
    tag = TAG,
)]
async fn create_account(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(body): Json<CreateAccount>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let account = service::create_account(&state.database, body).await?;
    Ok(ok(account))
}

#[utoipa::path(
    post,
    path = "/journal-entries",
    request_body = CreateJournalEntry,
    responses((status = OK, body = JournalEntry)),
    tag = TAG,
)]
async fn post_journal_entry(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(body): Json<CreateJournalEntry>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let entry = service::post_entry(&state.database, body, None).await?;
    Ok(ok(entry))
}

#[utoipa::path(
    post,
    path = "/bank-transactions/import",
    request_body = ImportRequest,
    responses((status = OK, body = ImportReport)),
    tag = TAG,
)]
async fn import_bank_transactions(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(body): Json<ImportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let imported = service::import_transactions(&state.database, body).await?;
    Ok(ok(ImportReport { imported }))
}

#[utoipa::path(
    post,
    path = "/bank-transactions/{id}/categorize",
    responses((status = OK, body = CategorizedTransaction)),
    tag = TAG,
)]
async fn categorize_bank_transaction(
    State(state): State<ApiState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let key = ResourceGuard::key(&id, "bank_transaction")?;
    let tx = service::get_transaction(&state.database, &key).await?;
    require_role(&state.database, &user, &tx.restaurant, Role::Manager).await?;
    let outcome = service::categorize(&state.database, &key).await?;
    Ok(ok(outcome))
}

#[utoipa::path(
    get,
    path = "/category-rules",
    params(RestaurantQuery),
    responses((status = OK, body = [CategoryRule])),
    tag = TAG,
)]
async fn list_category_rules(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<RestaurantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;
    let rules = service::list_rules(&state.database, &query.restaurant).await?;
    Ok(ok(rules))
}

#[utoipa::path(
    post,
    path = "/category-rules",
    request_body = CreateCategoryRule,
    responses((status = OK, body = CategoryRule)),
    tag = TAG,
)]
async fn create_category_rule(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(body): Json<CreateCategoryRule>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let rule = service::create_rule(&state.database, body).await?;
    Ok(ok(rule))
}

#[utoipa::path(
    get,
    path = "/reports/pnl",
    params(PnlQuery),
    responses((status = OK, body = PnlReport)),
    tag = TAG,
)]
async fn pnl_report(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<PnlQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;
    let report = service::pnl(&state.database, &query.restaurant, query.from, query.to).await?;
    Ok(ok(report))
}

#[utoipa::path(
    get,
    path = "/pending-outflows",
    params(RestaurantQuery),
    responses((status = OK, body = [PendingOutflow])),
    tag = TAG,
)]
async fn list_pending_outflows(
    State(state): State<ApiState>,
    user: AuthUser,
    Query(query): Query<RestaurantQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &query.restaurant, Role::Manager).await?;
    let outflows = service::list_pending_outflows(&state.database, &query.restaurant).await?;
    Ok(ok(outflows))
}

#[utoipa::path(
    post,
    path = "/pending-outflows",
    request_body = CreatePendingOutflow,
    responses((status = OK, body = PendingOutflow)),
    tag = TAG,
)]
async fn create_pending_outflow(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(body): Json<CreatePendingOutflow>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let outflow = service::create_pending_outflow(&state.database, body).await?;
    Ok(ok(outflow))
}

#[utoipa::path(
    post,
    path = "/pending-outflows/reconcile",
    request_body = ReconcileRequest,
    responses((status = OK, body = ReconcileReport)),
    tag = TAG,
)]
async fn reconcile_pending_outflows(
    State(state): State<ApiState>,
    user: AuthUser,
    Json(body): Json<ReconcileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&state.database, &user, &body.restaurant, Role::Manager).await?;
    let report = service::reconcile(&state.database, &body.restaurant).await?;
    Ok(ok(report))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_accounts, create_account))
        .routes(routes!(post_journal_entry))
        .routes(routes!(import_bank_transactions))
        .routes(routes!(categorize_bank_transaction))
        .routes(routes!(list_category_rules, create_category_rule))
        .routes(routes!(pnl_report))
        .routes(routes!(list_pending_outflows, create_pending_outflow))
        .routes(routes!(reconcile_pending_outflows))
}

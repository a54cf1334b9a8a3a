use axum::Json;
use axum::extract::{Path, State};
use pennywise_core::{AppError, ErrorResponse};
use pennywise_models::{AccountResponse, UpdateAccessRequest};
use uuid::Uuid;

use super::service::AdminService;
use crate::middleware::auth::{RequireAccountsManage, RequireAccountsRead};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get any account by id
#[utoipa::path(
    get,
    path = "/api/admin/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 403, description = "Role below admin or missing accounts:read", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_account(
    State(state): State<AppState>,
    _: RequireAccountsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    let view = AdminService::get_account(state.accounts.as_ref(), id).await?;
    Ok(Json(AccountResponse::new(view)))
}

/// Set an account's role and permissions
#[utoipa::path(
    put,
    path = "/api/admin/accounts/{id}/access",
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = UpdateAccessRequest,
    responses(
        (status = 200, description = "Access updated", body = AccountResponse),
        (status = 400, description = "Unknown permission", body = ErrorResponse),
        (status = 401, description = "Not authorized", body = ErrorResponse),
        (status = 403, description = "Missing accounts:manage or role too high", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_access(
    State(state): State<AppState>,
    RequireAccountsManage(caller): RequireAccountsManage,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAccessRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let view = AdminService::update_access(state.accounts.as_ref(), &caller, id, dto).await?;
    Ok(Json(AccountResponse::new(view)))
}

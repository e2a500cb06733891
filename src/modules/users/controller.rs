use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::users::model::{Account, RoleResponse, SyncAccountDto, UpdateRoleDto};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/users/create-or-update",
    request_body = SyncAccountDto,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 200, description = "Account refreshed", body = Account),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Another account holds this email or identity")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn sync_account(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SyncAccountDto>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let (account, created) = UserService::sync_account(state.store.as_ref(), &user.0, dto).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(account)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts, newest first", body = [Account]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_accounts(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = UserService::get_accounts(state.store.as_ref()).await?;

    Ok(Json(accounts))
}

#[utoipa::path(
    get,
    path = "/api/users/role/{role}",
    params(("role" = String, Path, description = "Student, Moderator or Admin")),
    responses(
        (status = 200, description = "Accounts holding the role", body = [Account]),
        (status = 400, description = "Unknown role label"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_accounts_by_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(role): Path<String>,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = UserService::get_accounts_by_role(state.store.as_ref(), &role).await?;

    Ok(Json(accounts))
}

#[utoipa::path(
    get,
    path = "/api/users/{email}/role",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "Role for the email; Student when unregistered", body = RoleResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_role(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<RoleResponse>, AppError> {
    let role = UserService::get_role_for_email(state.store.as_ref(), &email).await?;

    Ok(Json(RoleResponse { role }))
}

#[utoipa::path(
    get,
    path = "/api/users/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "Account details", body = Account),
        (status = 404, description = "Account not found")
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Account>, AppError> {
    let account = UserService::get_account_by_email(state.store.as_ref(), &email).await?;

    Ok(Json(account))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = Account),
        (status = 400, description = "Unknown role label"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Account not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateRoleDto>,
) -> Result<Json<Account>, AppError> {
    let account = UserService::update_role(state.store.as_ref(), id, &dto.role).await?;

    Ok(Json(account))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Account not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    UserService::delete_account(state.store.as_ref(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireAccount, RequireAdmin};
use crate::modules::role_requests::model::{
    CreateRoleRequestDto, ReviewRoleRequestDto, RoleRequest,
};
use crate::modules::role_requests::service::RoleRequestService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/role-requests/create",
    request_body = CreateRoleRequestDto,
    responses(
        (status = 201, description = "Request filed", body = RoleRequest),
        (status = 400, description = "Unknown or non-elevating role label"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not registered"),
        (status = 409, description = "Already elevated, or a pending request exists")
    ),
    tag = "Role Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user, dto))]
pub async fn create_role_request(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
    ValidatedJson(dto): ValidatedJson<CreateRoleRequestDto>,
) -> Result<(StatusCode, Json<RoleRequest>), AppError> {
    let request = RoleRequestService::create_request(state.store.as_ref(), &user, dto).await?;

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/role-requests/my-requests",
    responses(
        (status = 200, description = "Caller's requests, newest first", body = [RoleRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account not registered")
    ),
    tag = "Role Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_my_role_requests(
    State(state): State<AppState>,
    RequireAccount(user): RequireAccount,
) -> Result<Json<Vec<RoleRequest>>, AppError> {
    let requests =
        RoleRequestService::get_requests_for(state.store.as_ref(), user.account_id).await?;

    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/role-requests/pending",
    responses(
        (status = 200, description = "Pending requests, newest first", body = [RoleRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Role Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_pending_role_requests(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<RoleRequest>>, AppError> {
    let requests = RoleRequestService::get_pending_requests(state.store.as_ref()).await?;

    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/role-requests/all",
    responses(
        (status = 200, description = "All requests, newest first", body = [RoleRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Role Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_all_role_requests(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<RoleRequest>>, AppError> {
    let requests = RoleRequestService::get_all_requests(state.store.as_ref()).await?;

    Ok(Json(requests))
}

#[utoipa::path(
    put,
    path = "/api/role-requests/approve/{id}",
    params(("id" = Uuid, Path, description = "Role request ID")),
    request_body = ReviewRoleRequestDto,
    responses(
        (status = 200, description = "Request approved; account role changed", body = RoleRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Role request not found"),
        (status = 409, description = "Request already reviewed")
    ),
    tag = "Role Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn approve_role_request(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<ReviewRoleRequestDto>,
) -> Result<Json<RoleRequest>, AppError> {
    let request =
        RoleRequestService::approve_request(state.store.as_ref(), &admin, id, dto).await?;

    Ok(Json(request))
}

#[utoipa::path(
    put,
    path = "/api/role-requests/reject/{id}",
    params(("id" = Uuid, Path, description = "Role request ID")),
    request_body = ReviewRoleRequestDto,
    responses(
        (status = 200, description = "Request rejected; account role unchanged", body = RoleRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Role request not found"),
        (status = 409, description = "Request already reviewed")
    ),
    tag = "Role Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn reject_role_request(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<ReviewRoleRequestDto>,
) -> Result<Json<RoleRequest>, AppError> {
    let request =
        RoleRequestService::reject_request(state.store.as_ref(), &admin, id, dto).await?;

    Ok(Json(request))
}

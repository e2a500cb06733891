use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::RequireAdmin;
use crate::modules::scholarships::model::{
    CreateScholarshipDto, PaginatedScholarshipsResponse, Scholarship, ScholarshipFilterParams,
    UpdateScholarshipDto,
};
use crate::modules::scholarships::service::ScholarshipService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/scholarships",
    params(ScholarshipFilterParams),
    responses(
        (status = 200, description = "Filtered page of scholarships", body = PaginatedScholarshipsResponse),
        (status = 400, description = "Unknown category label")
    ),
    tag = "Scholarships"
)]
#[instrument(skip(state, params))]
pub async fn get_scholarships(
    State(state): State<AppState>,
    Query(params): Query<ScholarshipFilterParams>,
) -> Result<Json<PaginatedScholarshipsResponse>, AppError> {
    let page = ScholarshipService::get_scholarships(state.store.as_ref(), params).await?;

    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/scholarships/top",
    responses(
        (status = 200, description = "Six cheapest scholarships by application fees", body = [Scholarship])
    ),
    tag = "Scholarships"
)]
#[instrument(skip(state))]
pub async fn get_top_scholarships(
    State(state): State<AppState>,
) -> Result<Json<Vec<Scholarship>>, AppError> {
    let scholarships = ScholarshipService::get_top_scholarships(state.store.as_ref()).await?;

    Ok(Json(scholarships))
}

#[utoipa::path(
    get,
    path = "/api/scholarships/{id}",
    params(("id" = Uuid, Path, description = "Scholarship ID")),
    responses(
        (status = 200, description = "Scholarship details", body = Scholarship),
        (status = 404, description = "Scholarship not found")
    ),
    tag = "Scholarships"
)]
#[instrument(skip(state))]
pub async fn get_scholarship(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Scholarship>, AppError> {
    let scholarship = ScholarshipService::get_scholarship(state.store.as_ref(), id).await?;

    Ok(Json(scholarship))
}

#[utoipa::path(
    post,
    path = "/api/scholarships",
    request_body = CreateScholarshipDto,
    responses(
        (status = 201, description = "Scholarship posted", body = Scholarship),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Scholarships",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_scholarship(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateScholarshipDto>,
) -> Result<(StatusCode, Json<Scholarship>), AppError> {
    let scholarship =
        ScholarshipService::create_scholarship(state.store.as_ref(), dto, &admin.email).await?;

    Ok((StatusCode::CREATED, Json(scholarship)))
}

#[utoipa::path(
    patch,
    path = "/api/scholarships/{id}",
    params(("id" = Uuid, Path, description = "Scholarship ID")),
    request_body = UpdateScholarshipDto,
    responses(
        (status = 200, description = "Scholarship updated", body = Scholarship),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Scholarship not found")
    ),
    tag = "Scholarships",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_scholarship(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateScholarshipDto>,
) -> Result<Json<Scholarship>, AppError> {
    let scholarship =
        ScholarshipService::update_scholarship(state.store.as_ref(), id, dto).await?;

    Ok(Json(scholarship))
}

#[utoipa::path(
    delete,
    path = "/api/scholarships/{id}",
    params(("id" = Uuid, Path, description = "Scholarship ID")),
    responses(
        (status = 204, description = "Scholarship deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Scholarship not found")
    ),
    tag = "Scholarships",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_scholarship(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ScholarshipService::delete_scholarship(state.store.as_ref(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireAdmin, RequireModerator, RequireStudent};
use crate::modules::applications::model::{
    Application, CreateApplicationDto, UpdatePaymentDto, UpdateStatusDto,
};
use crate::modules::applications::service::ApplicationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationDto,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only"),
        (status = 404, description = "Scholarship not found"),
        (status = 409, description = "Already applied for this scholarship")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student, dto))]
pub async fn create_application(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateApplicationDto>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let application = ApplicationService::submit(state.store.as_ref(), &student, dto).await?;

    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications/my-applications",
    responses(
        (status = 200, description = "Caller's applications, newest first", body = [Application]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student))]
pub async fn get_my_applications(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
) -> Result<Json<Vec<Application>>, AppError> {
    let applications =
        ApplicationService::get_applications_for(state.store.as_ref(), &student.email).await?;

    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    responses(
        (status = 200, description = "All applications", body = [Application]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Moderator or Admin only")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_applications(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
) -> Result<Json<Vec<Application>>, AppError> {
    let applications = ApplicationService::get_applications(state.store.as_ref()).await?;

    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application details", body = Application),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Moderator or Admin only"),
        (status = 404, description = "Application not found")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_application(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, AppError> {
    let application = ApplicationService::get_application(state.store.as_ref(), id).await?;

    Ok(Json(application))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = Application),
        (status = 400, description = "Unknown status label"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Moderator or Admin only"),
        (status = 404, description = "Application not found")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_application_status(
    State(state): State<AppState>,
    RequireModerator(_moderator): RequireModerator,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateStatusDto>,
) -> Result<Json<Application>, AppError> {
    let application = ApplicationService::update_status(state.store.as_ref(), id, dto).await?;

    Ok(Json(application))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}/payment",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdatePaymentDto,
    responses(
        (status = 200, description = "Payment state corrected", body = Application),
        (status = 400, description = "Unknown payment status label"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Application not found")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_application_payment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdatePaymentDto>,
) -> Result<Json<Application>, AppError> {
    let application = ApplicationService::update_payment(state.store.as_ref(), id, dto).await?;

    Ok(Json(application))
}

#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your application"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application is already being processed")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student))]
pub async fn delete_application(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ApplicationService::delete_own(state.store.as_ref(), &student, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

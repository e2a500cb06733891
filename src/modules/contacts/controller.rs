use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::RequireAdmin;
use crate::modules::contacts::model::{
    Contact, ContactFilterParams, ContactStats, CreateContactDto, PaginatedContactsResponse,
    UpdateContactDto,
};
use crate::modules::contacts::service::ContactService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactDto,
    responses(
        (status = 201, description = "Message received", body = Contact),
        (status = 400, description = "Invalid email or empty fields")
    ),
    tag = "Contacts"
)]
#[instrument(skip(state, dto))]
pub async fn create_contact(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateContactDto>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = ContactService::create_contact(state.store.as_ref(), dto).await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    params(ContactFilterParams),
    responses(
        (status = 200, description = "Paginated contact messages", body = PaginatedContactsResponse),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_contacts(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ContactFilterParams>,
) -> Result<Json<PaginatedContactsResponse>, AppError> {
    let response = ContactService::get_contacts(state.store.as_ref(), params).await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/contacts/stats",
    responses(
        (status = 200, description = "Message counts by status", body = ContactStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_contact_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ContactStats>, AppError> {
    let stats = ContactService::get_contact_stats(state.store.as_ref()).await?;

    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact message ID")),
    responses(
        (status = 200, description = "Contact message", body = Contact),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Contact message not found")
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_contact(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Contact>, AppError> {
    let contact = ContactService::get_contact(state.store.as_ref(), id).await?;

    Ok(Json(contact))
}

#[utoipa::path(
    patch,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact message ID")),
    request_body = UpdateContactDto,
    responses(
        (status = 200, description = "Contact message updated", body = Contact),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Contact message not found")
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_contact(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(mut dto): Json<UpdateContactDto>,
) -> Result<Json<Contact>, AppError> {
    // A reply is attributed to the acting admin unless the payload names someone.
    if dto.response.is_some() && dto.responded_by.is_none() {
        dto.responded_by = Some(admin.display_name.clone());
    }

    let contact = ContactService::update_contact(state.store.as_ref(), id, dto).await?;

    Ok(Json(contact))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact message ID")),
    responses(
        (status = 204, description = "Contact message deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Contact message not found")
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_contact(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ContactService::delete_contact(state.store.as_ref(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}

//! Role request data models and DTOs.
//!
//! A role request is the only self-service path to elevation: a student
//! asks for `Moderator` or `Admin` with a justification, an admin approves
//! or rejects. Approval atomically flips the requester's account role;
//! both outcomes are terminal.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::users::model::Role;

/// Lifecycle state of a role request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A request for role elevation.
///
/// Requester email and name are denormalized so admin listings do not
/// join accounts.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct RoleRequest {
    pub id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub current_role: Role,
    pub requested_role: Role,
    pub justification: String,
    pub status: RequestStatus,
    pub reviewed_by: Option<Uuid>,
    pub admin_response: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a role request.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateRoleRequestDto {
    /// `Moderator` or `Admin`.
    pub requested_role: String,
    #[validate(length(min = 1))]
    pub justification: String,
}

/// DTO for an admin resolving a request; the response text is optional.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ReviewRoleRequestDto {
    pub admin_response: Option<String>,
}

/// Store input for creating a role request.
#[derive(Debug, Clone)]
pub struct NewRoleRequest {
    pub account_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub current_role: Role,
    pub requested_role: Role,
    pub justification: String,
}

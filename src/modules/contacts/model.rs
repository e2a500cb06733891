//! Contact message data models and DTOs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationMeta;

/// Handling state of a contact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contact_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Reading,
    Replied,
    Closed,
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ContactStatus::New),
            "reading" => Ok(ContactStatus::Reading),
            "replied" => Ok(ContactStatus::Replied),
            "closed" => Ok(ContactStatus::Closed),
            other => Err(format!(
                "Invalid contact status '{other}'. Must be new, reading, replied, or closed"
            )),
        }
    }
}

/// A message from the public contact form.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub response: Option<String>,
    pub responded_by: Option<String>,
    pub responded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for the public contact form.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateContactDto {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
}

/// DTO for an admin updating a contact message.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateContactDto {
    /// One of `new`, `reading`, `replied`, `closed`.
    pub status: Option<String>,
    pub response: Option<String>,
    pub responded_by: Option<String>,
}

/// Query parameters for the admin contact listing.
#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct ContactFilterParams {
    /// Status label filter; empty means all.
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::utils::pagination::deserialize_optional_i64"
    )]
    pub page: Option<i64>,
    #[serde(
        default,
        deserialize_with = "crate::utils::pagination::deserialize_optional_i64"
    )]
    pub limit: Option<i64>,
}

impl ContactFilterParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).max(1).min(100)
    }

    pub fn offset(&self) -> i64 {
        (self.page.unwrap_or(1).max(1) - 1) * self.limit()
    }
}

/// Store-level patch applied by the admin update endpoint.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub status: Option<ContactStatus>,
    pub response: Option<String>,
    pub responded_by: Option<String>,
}

/// Per-status message count.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct ContactStatusCount {
    pub status: ContactStatus,
    pub count: i64,
}

/// Aggregate counts for the admin dashboard.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ContactStats {
    pub total: i64,
    pub new: i64,
    pub replied: i64,
    pub by_status: Vec<ContactStatusCount>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedContactsResponse {
    pub data: Vec<Contact>,
    pub meta: PaginationMeta,
}

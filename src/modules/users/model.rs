//! Account data models and DTOs.
//!
//! Accounts are the local mirror of identities held by the external
//! identity provider. The backend stores no credentials: an account is
//! created (or refreshed) the first time a verified token reaches
//! `POST /api/users/create-or-update`, keyed by the provider's subject id
//! and the email it attests.
//!
//! # Core Types
//!
//! - [`Account`] - Account entity from the database
//! - [`Role`] - Platform role: `Student`, `Moderator` or `Admin`
//!
//! # Request DTOs
//!
//! - [`SyncAccountDto`] - Display fields for create-or-update
//! - [`UpdateRoleDto`] - Admin role change (role as string, parsed server-side)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Platform role stored on an account.
///
/// New accounts start as `Student`. Elevation to `Moderator` or `Admin`
/// happens through the role-request workflow or direct admin action;
/// there is no self-service path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_role")]
pub enum Role {
    Student,
    Moderator,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Student => "Student",
            Role::Moderator => "Moderator",
            Role::Admin => "Admin",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Role::Student),
            "Moderator" => Ok(Role::Moderator),
            "Admin" => Ok(Role::Admin),
            other => Err(format!(
                "Invalid role '{other}'. Must be Student, Moderator, or Admin"
            )),
        }
    }
}

/// An account in the system.
///
/// `external_subject` ties the row to the identity provider and is never
/// serialized into API responses.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    #[serde(skip_serializing)]
    pub external_subject: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Display fields accepted by create-or-update.
///
/// Email and subject are taken from the verified token, never from the
/// request body.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct SyncAccountDto {
    #[validate(length(min = 1))]
    pub name: String,
    pub photo_url: Option<String>,
}

/// DTO for an admin changing an account's role.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct UpdateRoleDto {
    /// `Student`, `Moderator` or `Admin`.
    pub role: String,
}

/// Response for the public role lookup.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct RoleResponse {
    pub role: Role,
}

/// Store input for creating or refreshing an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub external_subject: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_exact_labels_only() {
        assert_eq!("Student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("Moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);

        assert!("student".parse::<Role>().is_err());
        assert!("ADMIN".parse::<Role>().is_err());
        assert!("SuperUser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_as_capitalized_label() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"Student\"");
        assert_eq!(Role::Moderator.to_string(), "Moderator");
    }

    #[test]
    fn external_subject_is_not_serialized() {
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            display_name: "A".to_string(),
            photo_url: None,
            external_subject: "sub-123".to_string(),
            role: Role::Student,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("external_subject").is_none());
        assert_eq!(json["email"], "a@b.com");
    }
}

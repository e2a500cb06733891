//! Application data models and DTOs.
//!
//! An application ties an applicant to a scholarship and carries two
//! independent state machines:
//!
//! - `application_status`: review progress
//!   (`pending → processing → completed | rejected`)
//! - `payment_status`: `unpaid → paid`, transitioned exactly once by
//!   payment confirmation
//!
//! Scholarship fee and university fields are denormalized onto the row at
//! submission time so later edits to the scholarship do not rewrite
//! history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Processing => "processing",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "processing" => Ok(ApplicationStatus::Processing),
            "completed" => Ok(ApplicationStatus::Completed),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!(
                "Invalid application status '{other}'. Must be pending, processing, completed, or rejected"
            )),
        }
    }
}

/// Fee payment state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(format!(
                "Invalid payment status '{other}'. Must be unpaid or paid"
            )),
        }
    }
}

/// A scholarship application.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Application {
    pub id: Uuid,
    pub scholarship_id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub degree: Option<String>,
    pub ssc_result: Option<String>,
    pub hsc_result: Option<String>,
    pub study_gap: Option<String>,
    pub university_name: String,
    pub scholarship_category: String,
    pub subject_category: Option<String>,
    pub application_fees: f64,
    pub service_charge: f64,
    pub application_status: ApplicationStatus,
    pub payment_status: PaymentStatus,
    pub transaction_ref: Option<String>,
    pub feedback: Option<String>,
    pub feedback_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Applicant-supplied profile fields, all optional.
///
/// The same shape is used when submitting, when saving an unpaid draft,
/// and when confirming payment (the gateway flow can carry a fresher
/// draft than the saved row).
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct ApplicationDraft {
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub degree: Option<String>,
    pub ssc_result: Option<String>,
    pub hsc_result: Option<String>,
    pub study_gap: Option<String>,
}

impl ApplicationDraft {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.photo_url.is_none()
            && self.address.is_none()
            && self.gender.is_none()
            && self.degree.is_none()
            && self.ssc_result.is_none()
            && self.hsc_result.is_none()
            && self.study_gap.is_none()
    }
}

/// DTO for submitting an application.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateApplicationDto {
    pub scholarship_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub draft: ApplicationDraft,
}

/// DTO for a moderator moving an application through review.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct UpdateStatusDto {
    /// One of `pending`, `processing`, `completed`, `rejected`.
    pub application_status: String,
    pub feedback: Option<String>,
}

/// DTO for an admin correcting the payment state directly.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct UpdatePaymentDto {
    /// `unpaid` or `paid`.
    pub payment_status: String,
}

/// Store input for inserting an application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub scholarship_id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub draft: ApplicationDraft,
    pub university_name: String,
    pub scholarship_category: String,
    pub subject_category: Option<String>,
    pub application_fees: f64,
    pub service_charge: f64,
    pub payment_status: PaymentStatus,
    pub transaction_ref: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_canonical_labels() {
        assert_eq!(
            "pending".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Pending
        );
        assert_eq!(
            "processing".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Processing
        );
        assert_eq!(
            "completed".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Completed
        );
        assert_eq!(
            "rejected".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Rejected
        );
    }

    #[test]
    fn status_rejects_unknown_labels() {
        assert!("approved".parse::<ApplicationStatus>().is_err());
        assert!("Pending".parse::<ApplicationStatus>().is_err());
        assert!("".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn payment_status_parsing() {
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!(
            "unpaid".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::Unpaid
        );
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn empty_draft_detection() {
        assert!(ApplicationDraft::default().is_empty());
        let draft = ApplicationDraft {
            phone: Some("123".to_string()),
            ..Default::default()
        };
        assert!(!draft.is_empty());
    }
}

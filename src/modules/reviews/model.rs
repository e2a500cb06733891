//! Review data models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A student's review of a scholarship.
///
/// Scholarship name and university are denormalized for listing pages.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub scholarship_id: Uuid,
    pub scholarship_name: String,
    pub university_name: String,
    pub author_email: String,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for posting a review.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateReviewDto {
    pub scholarship_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub comment: String,
}

/// DTO for an author editing their review.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateReviewDto {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(min = 1))]
    pub comment: Option<String>,
}

/// Query parameters for the public review listing.
#[derive(Deserialize, Debug, Default, utoipa::IntoParams)]
pub struct ReviewFilterParams {
    /// Restrict to reviews written by this email.
    pub email: Option<String>,
}

/// Store input for inserting a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub scholarship_id: Uuid,
    pub scholarship_name: String,
    pub university_name: String,
    pub author_email: String,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub rating: i32,
    pub comment: String,
}

//! Scholarship data models and DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationMeta;

/// Funding category of a scholarship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "scholarship_category")]
pub enum ScholarshipCategory {
    #[serde(rename = "Full Fund")]
    #[sqlx(rename = "Full Fund")]
    FullFund,
    Partial,
    #[serde(rename = "Self-fund")]
    #[sqlx(rename = "Self-fund")]
    SelfFund,
}

impl fmt::Display for ScholarshipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScholarshipCategory::FullFund => "Full Fund",
            ScholarshipCategory::Partial => "Partial",
            ScholarshipCategory::SelfFund => "Self-fund",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ScholarshipCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full Fund" => Ok(ScholarshipCategory::FullFund),
            "Partial" => Ok(ScholarshipCategory::Partial),
            "Self-fund" => Ok(ScholarshipCategory::SelfFund),
            other => Err(format!(
                "Invalid category '{other}'. Must be Full Fund, Partial, or Self-fund"
            )),
        }
    }
}

/// Degree level a scholarship funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "degree_level")]
pub enum Degree {
    Diploma,
    Bachelor,
    Masters,
}

/// A posted scholarship.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Scholarship {
    pub id: Uuid,
    pub name: String,
    pub university_name: String,
    pub university_image: Option<String>,
    pub university_country: String,
    pub university_city: Option<String>,
    pub university_rank: Option<i32>,
    pub subject_category: Option<String>,
    pub category: ScholarshipCategory,
    pub degree: Degree,
    pub tuition_fees: Option<f64>,
    pub application_fees: f64,
    pub service_charge: f64,
    pub application_deadline: chrono::DateTime<chrono::Utc>,
    pub description: Option<String>,
    pub posted_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for posting a new scholarship. Admin only.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateScholarshipDto {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub university_name: String,
    pub university_image: Option<String>,
    #[validate(length(min = 1))]
    pub university_country: String,
    pub university_city: Option<String>,
    pub university_rank: Option<i32>,
    pub subject_category: Option<String>,
    pub category: ScholarshipCategory,
    pub degree: Degree,
    #[validate(range(min = 0.0))]
    pub tuition_fees: Option<f64>,
    #[validate(range(min = 0.0))]
    pub application_fees: f64,
    #[validate(range(min = 0.0))]
    pub service_charge: f64,
    pub application_deadline: chrono::DateTime<chrono::Utc>,
    pub description: Option<String>,
}

/// Partial update for a scholarship. Admin only.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateScholarshipDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub university_name: Option<String>,
    pub university_image: Option<String>,
    pub university_country: Option<String>,
    pub university_city: Option<String>,
    pub university_rank: Option<i32>,
    pub subject_category: Option<String>,
    pub category: Option<ScholarshipCategory>,
    pub degree: Option<Degree>,
    #[validate(range(min = 0.0))]
    pub tuition_fees: Option<f64>,
    #[validate(range(min = 0.0))]
    pub application_fees: Option<f64>,
    #[validate(range(min = 0.0))]
    pub service_charge: Option<f64>,
    pub application_deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub description: Option<String>,
}

/// Sort keys the listing endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScholarshipSort {
    PostDate,
    ApplicationFees,
}

/// Query parameters for browsing scholarships.
#[derive(Deserialize, Debug, Default, IntoParams, ToSchema)]
pub struct ScholarshipFilterParams {
    /// Case-insensitive match on name, university, and subject.
    pub search: Option<String>,
    /// Funding category label, e.g. `Full Fund`.
    pub category: Option<String>,
    pub country: Option<String>,
    /// `post_date` (default) or `application_fees`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
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

impl ScholarshipFilterParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(12).max(1).min(100)
    }

    pub fn offset(&self) -> i64 {
        (self.page.unwrap_or(1).max(1) - 1) * self.limit()
    }

    pub fn sort(&self) -> ScholarshipSort {
        match self.sort_by.as_deref() {
            Some("application_fees") | Some("applicationFees") => ScholarshipSort::ApplicationFees,
            _ => ScholarshipSort::PostDate,
        }
    }

    pub fn ascending(&self) -> bool {
        matches!(self.sort_order.as_deref(), Some("asc"))
    }
}

/// Store-level filter assembled from [`ScholarshipFilterParams`].
#[derive(Debug, Clone)]
pub struct ScholarshipFilter {
    pub search: Option<String>,
    pub category: Option<ScholarshipCategory>,
    pub country: Option<String>,
    pub sort: ScholarshipSort,
    pub ascending: bool,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedScholarshipsResponse {
    pub data: Vec<Scholarship>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_round_trip_serde() {
        let json = serde_json::to_string(&ScholarshipCategory::FullFund).unwrap();
        assert_eq!(json, "\"Full Fund\"");
        let back: ScholarshipCategory = serde_json::from_str("\"Self-fund\"").unwrap();
        assert_eq!(back, ScholarshipCategory::SelfFund);
    }

    #[test]
    fn filter_params_defaults() {
        let params = ScholarshipFilterParams::default();
        assert_eq!(params.limit(), 12);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.sort(), ScholarshipSort::PostDate);
        assert!(!params.ascending());
    }

    #[test]
    fn filter_params_page_math() {
        let params = ScholarshipFilterParams {
            page: Some(3),
            limit: Some(12),
            ..Default::default()
        };
        assert_eq!(params.offset(), 24);
    }

    #[test]
    fn sort_accepts_both_spellings() {
        let params = ScholarshipFilterParams {
            sort_by: Some("applicationFees".to_string()),
            ..Default::default()
        };
        assert_eq!(params.sort(), ScholarshipSort::ApplicationFees);
    }
}

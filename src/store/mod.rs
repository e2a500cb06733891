//! Persistence ports.
//!
//! Each aggregate gets its own repository trait; [`Store`] bundles them so
//! application state can hold a single `Arc<dyn Store>`. The production
//! adapter is [`postgres::PgStore`]; tests use the in-memory
//! [`memory::MemStore`] (behind the `test-utils` feature), which reproduces
//! the same uniqueness and conditional-transition semantics.
//!
//! Write operations that enforce an invariant (one application per
//! scholarship and email, one pending role request per account, the
//! one-way unpaid-to-paid transition) report violations as
//! [`StoreError::Conflict`]. Races are settled by the store, not by
//! application-level locking: unique indexes decide duplicate creates,
//! and state transitions are conditional updates that fail when another
//! writer got there first.

use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::applications::model::{
    Application, ApplicationDraft, ApplicationStatus, NewApplication, PaymentStatus,
};
use crate::modules::contacts::model::{
    Contact, ContactPatch, ContactStats, ContactStatus, CreateContactDto,
};
use crate::modules::reviews::model::{NewReview, Review, UpdateReviewDto};
use crate::modules::role_requests::model::{NewRoleRequest, RoleRequest};
use crate::modules::scholarships::model::{
    CreateScholarshipDto, Scholarship, ScholarshipFilter, UpdateScholarshipDto,
};
use crate::modules::users::model::{Account, NewAccount, Role};

#[cfg(feature = "test-utils")]
pub mod memory;
pub mod postgres;

#[cfg(feature = "test-utils")]
pub use memory::MemStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str) -> Self {
        StoreError::NotFound { entity }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create the account, or refresh display fields when a row already
    /// exists for the email or subject. Returns the row and whether it
    /// was created. A lost unique-key race is a `Conflict`.
    async fn upsert_account(&self, new: NewAccount) -> StoreResult<(Account, bool)>;
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;
    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;
    async fn list_accounts_by_role(&self, role: Role) -> StoreResult<Vec<Account>>;
    async fn set_account_role(&self, id: Uuid, role: Role) -> StoreResult<Account>;
    async fn delete_account(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait ScholarshipStore: Send + Sync {
    async fn insert_scholarship(
        &self,
        dto: CreateScholarshipDto,
        posted_by: &str,
    ) -> StoreResult<Scholarship>;
    async fn find_scholarship(&self, id: Uuid) -> StoreResult<Option<Scholarship>>;
    /// Filtered page of scholarships plus the total row count for the
    /// same filter.
    async fn list_scholarships(
        &self,
        filter: ScholarshipFilter,
    ) -> StoreResult<(Vec<Scholarship>, i64)>;
    /// Cheapest application fees first; newest first among ties.
    async fn top_scholarships(&self, limit: i64) -> StoreResult<Vec<Scholarship>>;
    async fn update_scholarship(
        &self,
        id: Uuid,
        dto: UpdateScholarshipDto,
    ) -> StoreResult<Scholarship>;
    async fn delete_scholarship(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Insert a new application. Duplicate (scholarship, applicant email)
    /// is a `Conflict`.
    async fn insert_application(&self, new: NewApplication) -> StoreResult<Application>;
    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>>;
    async fn find_application_for(
        &self,
        scholarship_id: Uuid,
        applicant_email: &str,
    ) -> StoreResult<Option<Application>>;
    async fn list_applications(&self) -> StoreResult<Vec<Application>>;
    async fn list_applications_for_email(&self, email: &str) -> StoreResult<Vec<Application>>;
    async fn set_application_review(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        feedback: Option<String>,
    ) -> StoreResult<Application>;
    async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> StoreResult<Application>;
    /// Merge draft fields into an existing row without touching payment
    /// state.
    async fn update_application_draft(
        &self,
        id: Uuid,
        draft: ApplicationDraft,
    ) -> StoreResult<Application>;
    /// Flip `unpaid -> paid`, merging the draft and recording the
    /// transaction reference. Fails with `Conflict` when the row is
    /// already paid, so a second confirmation never double-applies.
    async fn mark_application_paid(
        &self,
        id: Uuid,
        transaction_ref: &str,
        draft: ApplicationDraft,
    ) -> StoreResult<Application>;
    /// Delete only while still `pending`; a reviewed row is a `Conflict`.
    async fn delete_application_if_pending(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert_review(&self, new: NewReview) -> StoreResult<Review>;
    async fn find_review(&self, id: Uuid) -> StoreResult<Option<Review>>;
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;
    async fn list_reviews_for_scholarship(&self, scholarship_id: Uuid) -> StoreResult<Vec<Review>>;
    async fn list_reviews_by_author(&self, email: &str) -> StoreResult<Vec<Review>>;
    async fn update_review(&self, id: Uuid, dto: UpdateReviewDto) -> StoreResult<Review>;
    async fn delete_review(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait RoleRequestStore: Send + Sync {
    /// Insert a pending request. A second pending request for the same
    /// account is a `Conflict` even under concurrent creates.
    async fn insert_role_request(&self, new: NewRoleRequest) -> StoreResult<RoleRequest>;
    async fn find_role_request(&self, id: Uuid) -> StoreResult<Option<RoleRequest>>;
    async fn list_role_requests(&self) -> StoreResult<Vec<RoleRequest>>;
    async fn list_pending_role_requests(&self) -> StoreResult<Vec<RoleRequest>>;
    async fn list_role_requests_for(&self, account_id: Uuid) -> StoreResult<Vec<RoleRequest>>;
    /// Approve a pending request and set the requester's role, as one
    /// atomic transition. Non-pending is a `Conflict`.
    async fn approve_role_request(
        &self,
        id: Uuid,
        reviewer: Uuid,
        response: String,
    ) -> StoreResult<RoleRequest>;
    /// Reject a pending request. The account role is untouched.
    async fn reject_role_request(
        &self,
        id: Uuid,
        reviewer: Uuid,
        response: String,
    ) -> StoreResult<RoleRequest>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_contact(&self, dto: CreateContactDto) -> StoreResult<Contact>;
    async fn find_contact(&self, id: Uuid) -> StoreResult<Option<Contact>>;
    async fn list_contacts(
        &self,
        status: Option<ContactStatus>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<Contact>, i64)>;
    async fn update_contact(&self, id: Uuid, patch: ContactPatch) -> StoreResult<Contact>;
    async fn delete_contact(&self, id: Uuid) -> StoreResult<()>;
    async fn contact_stats(&self) -> StoreResult<ContactStats>;
}

/// Umbrella trait for application state.
pub trait Store:
    AccountStore
    + ScholarshipStore
    + ApplicationStore
    + ReviewStore
    + RoleRequestStore
    + ContactStore
{
}

impl<T> Store for T where
    T: AccountStore
        + ScholarshipStore
        + ApplicationStore
        + ReviewStore
        + RoleRequestStore
        + ContactStore
{
}

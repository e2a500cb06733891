//! In-memory store for tests.
//!
//! Mirrors the Postgres adapter's semantics behind a single mutex: the
//! same unique-key conflicts, the same conditional state transitions, the
//! same newest-first orderings. Integration tests run the full router
//! against this store without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::modules::applications::model::{
    Application, ApplicationDraft, ApplicationStatus, NewApplication, PaymentStatus,
};
use crate::modules::contacts::model::{
    Contact, ContactPatch, ContactStats, ContactStatus, ContactStatusCount, CreateContactDto,
};
use crate::modules::reviews::model::{NewReview, Review, UpdateReviewDto};
use crate::modules::role_requests::model::{NewRoleRequest, RequestStatus, RoleRequest};
use crate::modules::scholarships::model::{
    CreateScholarshipDto, Scholarship, ScholarshipFilter, ScholarshipSort, UpdateScholarshipDto,
};
use crate::modules::users::model::{Account, NewAccount, Role};
use crate::store::{
    AccountStore, ApplicationStore, ContactStore, ReviewStore, RoleRequestStore, ScholarshipStore,
    StoreError, StoreResult,
};

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    scholarships: Vec<Scholarship>,
    applications: Vec<Application>,
    reviews: Vec<Review>,
    role_requests: Vec<RoleRequest>,
    contacts: Vec<Contact>,
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn merge_draft(application: &mut Application, draft: &ApplicationDraft) {
    if let Some(v) = &draft.phone {
        application.phone = Some(v.clone());
    }
    if let Some(v) = &draft.photo_url {
        application.photo_url = Some(v.clone());
    }
    if let Some(v) = &draft.address {
        application.address = Some(v.clone());
    }
    if let Some(v) = &draft.gender {
        application.gender = Some(v.clone());
    }
    if let Some(v) = &draft.degree {
        application.degree = Some(v.clone());
    }
    if let Some(v) = &draft.ssc_result {
        application.ssc_result = Some(v.clone());
    }
    if let Some(v) = &draft.hsc_result {
        application.hsc_result = Some(v.clone());
    }
    if let Some(v) = &draft.study_gap {
        application.study_gap = Some(v.clone());
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl AccountStore for MemStore {
    async fn upsert_account(&self, new: NewAccount) -> StoreResult<(Account, bool)> {
        let mut tables = self.inner.lock().unwrap();
        let email = new.email.to_lowercase();

        if let Some(account) = tables
            .accounts
            .iter_mut()
            .find(|a| a.email == email || a.external_subject == new.external_subject)
        {
            account.display_name = new.display_name;
            if new.photo_url.is_some() {
                account.photo_url = new.photo_url;
            }
            account.updated_at = Utc::now();
            return Ok((account.clone(), false));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email,
            display_name: new.display_name,
            photo_url: new.photo_url,
            external_subject: new.external_subject,
            role: new.role,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.push(account.clone());

        Ok((account, true))
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let tables = self.inner.lock().unwrap();
        let email = email.to_lowercase();
        Ok(tables.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.accounts.iter().rev().cloned().collect())
    }

    async fn list_accounts_by_role(&self, role: Role) -> StoreResult<Vec<Account>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .accounts
            .iter()
            .rev()
            .filter(|a| a.role == role)
            .cloned()
            .collect())
    }

    async fn set_account_role(&self, id: Uuid, role: Role) -> StoreResult<Account> {
        let mut tables = self.inner.lock().unwrap();
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::not_found("Account"))?;
        account.role = role;
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn delete_account(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.accounts.len();
        tables.accounts.retain(|a| a.id != id);
        if tables.accounts.len() == before {
            return Err(StoreError::not_found("Account"));
        }
        Ok(())
    }
}

fn matches_filter(s: &Scholarship, filter: &ScholarshipFilter) -> bool {
    if let Some(search) = &filter.search {
        let hit = contains_ci(&s.name, search)
            || contains_ci(&s.university_name, search)
            || s.subject_category
                .as_deref()
                .is_some_and(|subject| contains_ci(subject, search));
        if !hit {
            return false;
        }
    }
    if let Some(category) = filter.category {
        if s.category != category {
            return false;
        }
    }
    if let Some(country) = &filter.country {
        if !contains_ci(&s.university_country, country) {
            return false;
        }
    }
    true
}

#[async_trait]
impl ScholarshipStore for MemStore {
    async fn insert_scholarship(
        &self,
        dto: CreateScholarshipDto,
        posted_by: &str,
    ) -> StoreResult<Scholarship> {
        let mut tables = self.inner.lock().unwrap();
        let now = Utc::now();
        let scholarship = Scholarship {
            id: Uuid::new_v4(),
            name: dto.name,
            university_name: dto.university_name,
            university_image: dto.university_image,
            university_country: dto.university_country,
            university_city: dto.university_city,
            university_rank: dto.university_rank,
            subject_category: dto.subject_category,
            category: dto.category,
            degree: dto.degree,
            tuition_fees: dto.tuition_fees,
            application_fees: dto.application_fees,
            service_charge: dto.service_charge,
            application_deadline: dto.application_deadline,
            description: dto.description,
            posted_by: posted_by.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.scholarships.push(scholarship.clone());
        Ok(scholarship)
    }

    async fn find_scholarship(&self, id: Uuid) -> StoreResult<Option<Scholarship>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.scholarships.iter().find(|s| s.id == id).cloned())
    }

    async fn list_scholarships(
        &self,
        filter: ScholarshipFilter,
    ) -> StoreResult<(Vec<Scholarship>, i64)> {
        let tables = self.inner.lock().unwrap();
        let mut matched: Vec<Scholarship> = tables
            .scholarships
            .iter()
            .filter(|s| matches_filter(s, &filter))
            .cloned()
            .collect();

        match filter.sort {
            ScholarshipSort::PostDate => matched.sort_by_key(|s| s.created_at),
            ScholarshipSort::ApplicationFees => {
                matched.sort_by(|a, b| a.application_fees.total_cmp(&b.application_fees))
            }
        }
        if !filter.ascending {
            matched.reverse();
        }

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn top_scholarships(&self, limit: i64) -> StoreResult<Vec<Scholarship>> {
        let tables = self.inner.lock().unwrap();
        let mut all: Vec<Scholarship> = tables.scholarships.clone();
        all.sort_by(|a, b| {
            a.application_fees
                .total_cmp(&b.application_fees)
                .then(b.created_at.cmp(&a.created_at))
        });
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }

    async fn update_scholarship(
        &self,
        id: Uuid,
        dto: UpdateScholarshipDto,
    ) -> StoreResult<Scholarship> {
        let mut tables = self.inner.lock().unwrap();
        let scholarship = tables
            .scholarships
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::not_found("Scholarship"))?;

        if let Some(v) = dto.name {
            scholarship.name = v;
        }
        if let Some(v) = dto.university_name {
            scholarship.university_name = v;
        }
        if let Some(v) = dto.university_image {
            scholarship.university_image = Some(v);
        }
        if let Some(v) = dto.university_country {
            scholarship.university_country = v;
        }
        if let Some(v) = dto.university_city {
            scholarship.university_city = Some(v);
        }
        if let Some(v) = dto.university_rank {
            scholarship.university_rank = Some(v);
        }
        if let Some(v) = dto.subject_category {
            scholarship.subject_category = Some(v);
        }
        if let Some(v) = dto.category {
            scholarship.category = v;
        }
        if let Some(v) = dto.degree {
            scholarship.degree = v;
        }
        if let Some(v) = dto.tuition_fees {
            scholarship.tuition_fees = Some(v);
        }
        if let Some(v) = dto.application_fees {
            scholarship.application_fees = v;
        }
        if let Some(v) = dto.service_charge {
            scholarship.service_charge = v;
        }
        if let Some(v) = dto.application_deadline {
            scholarship.application_deadline = v;
        }
        if let Some(v) = dto.description {
            scholarship.description = Some(v);
        }
        scholarship.updated_at = Utc::now();

        Ok(scholarship.clone())
    }

    async fn delete_scholarship(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.scholarships.len();
        tables.scholarships.retain(|s| s.id != id);
        if tables.scholarships.len() == before {
            return Err(StoreError::not_found("Scholarship"));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for MemStore {
    async fn insert_application(&self, new: NewApplication) -> StoreResult<Application> {
        let mut tables = self.inner.lock().unwrap();
        let email = new.applicant_email.to_lowercase();

        if tables
            .applications
            .iter()
            .any(|a| a.scholarship_id == new.scholarship_id && a.applicant_email == email)
        {
            return Err(StoreError::conflict(
                "You have already applied for this scholarship",
            ));
        }

        let now = Utc::now();
        let mut application = Application {
            id: Uuid::new_v4(),
            scholarship_id: new.scholarship_id,
            applicant_id: new.applicant_id,
            applicant_name: new.applicant_name,
            applicant_email: email,
            phone: None,
            photo_url: None,
            address: None,
            gender: None,
            degree: None,
            ssc_result: None,
            hsc_result: None,
            study_gap: None,
            university_name: new.university_name,
            scholarship_category: new.scholarship_category,
            subject_category: new.subject_category,
            application_fees: new.application_fees,
            service_charge: new.service_charge,
            application_status: ApplicationStatus::Pending,
            payment_status: new.payment_status,
            transaction_ref: new.transaction_ref,
            feedback: None,
            feedback_at: None,
            created_at: now,
            updated_at: now,
        };
        merge_draft(&mut application, &new.draft);
        tables.applications.push(application.clone());

        Ok(application)
    }

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_application_for(
        &self,
        scholarship_id: Uuid,
        applicant_email: &str,
    ) -> StoreResult<Option<Application>> {
        let tables = self.inner.lock().unwrap();
        let email = applicant_email.to_lowercase();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.scholarship_id == scholarship_id && a.applicant_email == email)
            .cloned())
    }

    async fn list_applications(&self) -> StoreResult<Vec<Application>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.applications.iter().rev().cloned().collect())
    }

    async fn list_applications_for_email(&self, email: &str) -> StoreResult<Vec<Application>> {
        let tables = self.inner.lock().unwrap();
        let email = email.to_lowercase();
        Ok(tables
            .applications
            .iter()
            .rev()
            .filter(|a| a.applicant_email == email)
            .cloned()
            .collect())
    }

    async fn set_application_review(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        feedback: Option<String>,
    ) -> StoreResult<Application> {
        let mut tables = self.inner.lock().unwrap();
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::not_found("Application"))?;
        application.application_status = status;
        if let Some(feedback) = feedback {
            application.feedback = Some(feedback);
            application.feedback_at = Some(Utc::now());
        }
        application.updated_at = Utc::now();
        Ok(application.clone())
    }

    async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> StoreResult<Application> {
        let mut tables = self.inner.lock().unwrap();
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::not_found("Application"))?;
        application.payment_status = status;
        application.updated_at = Utc::now();
        Ok(application.clone())
    }

    async fn update_application_draft(
        &self,
        id: Uuid,
        draft: ApplicationDraft,
    ) -> StoreResult<Application> {
        let mut tables = self.inner.lock().unwrap();
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::not_found("Application"))?;
        merge_draft(application, &draft);
        application.updated_at = Utc::now();
        Ok(application.clone())
    }

    async fn mark_application_paid(
        &self,
        id: Uuid,
        transaction_ref: &str,
        draft: ApplicationDraft,
    ) -> StoreResult<Application> {
        let mut tables = self.inner.lock().unwrap();
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::not_found("Application"))?;

        if application.payment_status == PaymentStatus::Paid {
            return Err(StoreError::conflict(
                "Payment has already been confirmed for this application",
            ));
        }

        application.payment_status = PaymentStatus::Paid;
        application.transaction_ref = Some(transaction_ref.to_string());
        merge_draft(application, &draft);
        application.updated_at = Utc::now();

        Ok(application.clone())
    }

    async fn delete_application_if_pending(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.inner.lock().unwrap();
        let application = tables
            .applications
            .iter()
            .find(|a| a.id == id)
            .ok_or(StoreError::not_found("Application"))?;

        if application.application_status != ApplicationStatus::Pending {
            return Err(StoreError::conflict(
                "Cannot delete an application that is already being processed",
            ));
        }

        tables.applications.retain(|a| a.id != id);
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for MemStore {
    async fn insert_review(&self, new: NewReview) -> StoreResult<Review> {
        let mut tables = self.inner.lock().unwrap();
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            scholarship_id: new.scholarship_id,
            scholarship_name: new.scholarship_name,
            university_name: new.university_name,
            author_email: new.author_email.to_lowercase(),
            author_name: new.author_name,
            author_photo: new.author_photo,
            rating: new.rating,
            comment: new.comment,
            created_at: now,
            updated_at: now,
        };
        tables.reviews.push(review.clone());
        Ok(review)
    }

    async fn find_review(&self, id: Uuid) -> StoreResult<Option<Review>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.reviews.iter().rev().cloned().collect())
    }

    async fn list_reviews_for_scholarship(&self, scholarship_id: Uuid) -> StoreResult<Vec<Review>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .reviews
            .iter()
            .rev()
            .filter(|r| r.scholarship_id == scholarship_id)
            .cloned()
            .collect())
    }

    async fn list_reviews_by_author(&self, email: &str) -> StoreResult<Vec<Review>> {
        let tables = self.inner.lock().unwrap();
        let email = email.to_lowercase();
        Ok(tables
            .reviews
            .iter()
            .rev()
            .filter(|r| r.author_email == email)
            .cloned()
            .collect())
    }

    async fn update_review(&self, id: Uuid, dto: UpdateReviewDto) -> StoreResult<Review> {
        let mut tables = self.inner.lock().unwrap();
        let review = tables
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::not_found("Review"))?;
        if let Some(rating) = dto.rating {
            review.rating = rating;
        }
        if let Some(comment) = dto.comment {
            review.comment = comment;
        }
        review.updated_at = Utc::now();
        Ok(review.clone())
    }

    async fn delete_review(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.reviews.len();
        tables.reviews.retain(|r| r.id != id);
        if tables.reviews.len() == before {
            return Err(StoreError::not_found("Review"));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleRequestStore for MemStore {
    async fn insert_role_request(&self, new: NewRoleRequest) -> StoreResult<RoleRequest> {
        let mut tables = self.inner.lock().unwrap();

        if tables
            .role_requests
            .iter()
            .any(|r| r.account_id == new.account_id && r.status == RequestStatus::Pending)
        {
            return Err(StoreError::conflict(
                "You already have a pending role request",
            ));
        }

        let request = RoleRequest {
            id: Uuid::new_v4(),
            account_id: new.account_id,
            email: new.email,
            display_name: new.display_name,
            current_role: new.current_role,
            requested_role: new.requested_role,
            justification: new.justification,
            status: RequestStatus::Pending,
            reviewed_by: None,
            admin_response: None,
            created_at: Utc::now(),
            reviewed_at: None,
        };
        tables.role_requests.push(request.clone());
        Ok(request)
    }

    async fn find_role_request(&self, id: Uuid) -> StoreResult<Option<RoleRequest>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.role_requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list_role_requests(&self) -> StoreResult<Vec<RoleRequest>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.role_requests.iter().rev().cloned().collect())
    }

    async fn list_pending_role_requests(&self) -> StoreResult<Vec<RoleRequest>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .role_requests
            .iter()
            .rev()
            .filter(|r| r.status == RequestStatus::Pending)
            .cloned()
            .collect())
    }

    async fn list_role_requests_for(&self, account_id: Uuid) -> StoreResult<Vec<RoleRequest>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .role_requests
            .iter()
            .rev()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn approve_role_request(
        &self,
        id: Uuid,
        reviewer: Uuid,
        response: String,
    ) -> StoreResult<RoleRequest> {
        let mut tables = self.inner.lock().unwrap();

        let request = tables
            .role_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::not_found("Role request"))?;

        if request.status != RequestStatus::Pending {
            return Err(StoreError::conflict(
                "This role request has already been reviewed",
            ));
        }

        request.status = RequestStatus::Approved;
        request.reviewed_by = Some(reviewer);
        request.admin_response = Some(response);
        request.reviewed_at = Some(Utc::now());
        let request = request.clone();

        if let Some(account) = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == request.account_id)
        {
            account.role = request.requested_role;
            account.updated_at = Utc::now();
        }

        Ok(request)
    }

    async fn reject_role_request(
        &self,
        id: Uuid,
        reviewer: Uuid,
        response: String,
    ) -> StoreResult<RoleRequest> {
        let mut tables = self.inner.lock().unwrap();

        let request = tables
            .role_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::not_found("Role request"))?;

        if request.status != RequestStatus::Pending {
            return Err(StoreError::conflict(
                "This role request has already been reviewed",
            ));
        }

        request.status = RequestStatus::Rejected;
        request.reviewed_by = Some(reviewer);
        request.admin_response = Some(response);
        request.reviewed_at = Some(Utc::now());

        Ok(request.clone())
    }
}

#[async_trait]
impl ContactStore for MemStore {
    async fn insert_contact(&self, dto: CreateContactDto) -> StoreResult<Contact> {
        let mut tables = self.inner.lock().unwrap();
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            full_name: dto.full_name,
            email: dto.email,
            subject: dto.subject,
            message: dto.message,
            status: ContactStatus::New,
            response: None,
            responded_by: None,
            responded_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn find_contact(&self, id: Uuid) -> StoreResult<Option<Contact>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn list_contacts(
        &self,
        status: Option<ContactStatus>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<Contact>, i64)> {
        let tables = self.inner.lock().unwrap();
        let matched: Vec<Contact> = tables
            .contacts
            .iter()
            .rev()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn update_contact(&self, id: Uuid, patch: ContactPatch) -> StoreResult<Contact> {
        let mut tables = self.inner.lock().unwrap();
        let contact = tables
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::not_found("Contact message"))?;

        if let Some(status) = patch.status {
            contact.status = status;
        }
        if let Some(response) = patch.response {
            contact.response = Some(response);
            contact.responded_by =
                Some(patch.responded_by.unwrap_or_else(|| "Admin".to_string()));
            contact.responded_at = Some(Utc::now());
        }
        contact.updated_at = Utc::now();

        Ok(contact.clone())
    }

    async fn delete_contact(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.contacts.len();
        tables.contacts.retain(|c| c.id != id);
        if tables.contacts.len() == before {
            return Err(StoreError::not_found("Contact message"));
        }
        Ok(())
    }

    async fn contact_stats(&self) -> StoreResult<ContactStats> {
        let tables = self.inner.lock().unwrap();
        let count_for = |status: ContactStatus| {
            tables.contacts.iter().filter(|c| c.status == status).count() as i64
        };

        let by_status: Vec<ContactStatusCount> = [
            ContactStatus::New,
            ContactStatus::Reading,
            ContactStatus::Replied,
            ContactStatus::Closed,
        ]
        .into_iter()
        .map(|status| ContactStatusCount {
            status,
            count: count_for(status),
        })
        .filter(|c| c.count > 0)
        .collect();

        Ok(ContactStats {
            total: tables.contacts.len() as i64,
            new: count_for(ContactStatus::New),
            replied: count_for(ContactStatus::Replied),
            by_status,
        })
    }
}

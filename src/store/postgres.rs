//! PostgreSQL store adapter.
//!
//! Queries use the runtime API with bind parameters throughout. Invariants
//! live in the schema: unique indexes settle duplicate creates, and state
//! transitions are `UPDATE ... WHERE <precondition>` so concurrent writers
//! cannot both win.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use async_trait::async_trait;

use crate::modules::applications::model::{
    Application, ApplicationDraft, ApplicationStatus, NewApplication, PaymentStatus,
};
use crate::modules::contacts::model::{
    Contact, ContactPatch, ContactStats, ContactStatus, ContactStatusCount, CreateContactDto,
};
use crate::modules::reviews::model::{NewReview, Review, UpdateReviewDto};
use crate::modules::role_requests::model::{NewRoleRequest, RoleRequest};
use crate::modules::scholarships::model::{
    CreateScholarshipDto, Scholarship, ScholarshipFilter, ScholarshipSort, UpdateScholarshipDto,
};
use crate::modules::users::model::{Account, NewAccount, Role};
use crate::store::{
    AccountStore, ApplicationStore, ContactStore, ReviewStore, RoleRequestStore, ScholarshipStore,
    StoreError, StoreResult,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translate a unique-index violation into a domain conflict; anything
/// else stays a backend error.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::conflict(message);
        }
    }
    StoreError::Backend(e)
}

#[async_trait]
impl AccountStore for PgStore {
    async fn upsert_account(&self, new: NewAccount) -> StoreResult<(Account, bool)> {
        let existing = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, display_name, photo_url, external_subject, role, created_at, updated_at
            FROM accounts
            WHERE email = LOWER($1) OR external_subject = $2
            "#,
        )
        .bind(&new.email)
        .bind(&new.external_subject)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(account) = existing {
            let updated = sqlx::query_as::<_, Account>(
                r#"
                UPDATE accounts
                SET display_name = $2, photo_url = COALESCE($3, photo_url), updated_at = NOW()
                WHERE id = $1
                RETURNING id, email, display_name, photo_url, external_subject, role, created_at, updated_at
                "#,
            )
            .bind(account.id)
            .bind(&new.display_name)
            .bind(&new.photo_url)
            .fetch_one(&self.pool)
            .await?;

            return Ok((updated, false));
        }

        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, display_name, photo_url, external_subject, role)
            VALUES (LOWER($1), $2, $3, $4, $5)
            RETURNING id, email, display_name, photo_url, external_subject, role, created_at, updated_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.display_name)
        .bind(&new.photo_url)
        .bind(&new.external_subject)
        .bind(new.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "An account already exists for this identity"))?;

        Ok((created, true))
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, display_name, photo_url, external_subject, role, created_at, updated_at
            FROM accounts
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, display_name, photo_url, external_subject, role, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, display_name, photo_url, external_subject, role, created_at, updated_at
            FROM accounts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn list_accounts_by_role(&self, role: Role) -> StoreResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, display_name, photo_url, external_subject, role, created_at, updated_at
            FROM accounts
            WHERE role = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn set_account_role(&self, id: Uuid, role: Role) -> StoreResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, display_name, photo_url, external_subject, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("Account"))?;

        Ok(account)
    }

    async fn delete_account(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Account"));
        }

        Ok(())
    }
}

/// Shared WHERE clause for the scholarship listing and its count query.
fn push_scholarship_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ScholarshipFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR university_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR subject_category ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(country) = &filter.country {
        qb.push(" AND university_country ILIKE ")
            .push_bind(format!("%{country}%"));
    }
}

#[async_trait]
impl ScholarshipStore for PgStore {
    async fn insert_scholarship(
        &self,
        dto: CreateScholarshipDto,
        posted_by: &str,
    ) -> StoreResult<Scholarship> {
        let scholarship = sqlx::query_as::<_, Scholarship>(
            r#"
            INSERT INTO scholarships (
                name, university_name, university_image, university_country, university_city,
                university_rank, subject_category, category, degree, tuition_fees,
                application_fees, service_charge, application_deadline, description, posted_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.university_name)
        .bind(&dto.university_image)
        .bind(&dto.university_country)
        .bind(&dto.university_city)
        .bind(dto.university_rank)
        .bind(&dto.subject_category)
        .bind(dto.category)
        .bind(dto.degree)
        .bind(dto.tuition_fees)
        .bind(dto.application_fees)
        .bind(dto.service_charge)
        .bind(dto.application_deadline)
        .bind(&dto.description)
        .bind(posted_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(scholarship)
    }

    async fn find_scholarship(&self, id: Uuid) -> StoreResult<Option<Scholarship>> {
        let scholarship =
            sqlx::query_as::<_, Scholarship>("SELECT * FROM scholarships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(scholarship)
    }

    async fn list_scholarships(
        &self,
        filter: ScholarshipFilter,
    ) -> StoreResult<(Vec<Scholarship>, i64)> {
        let mut qb = QueryBuilder::new("SELECT * FROM scholarships WHERE TRUE");
        push_scholarship_filters(&mut qb, &filter);

        match filter.sort {
            ScholarshipSort::PostDate => qb.push(" ORDER BY created_at"),
            ScholarshipSort::ApplicationFees => qb.push(" ORDER BY application_fees"),
        };
        qb.push(if filter.ascending { " ASC" } else { " DESC" });
        qb.push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let scholarships = qb
            .build_query_as::<Scholarship>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM scholarships WHERE TRUE");
        push_scholarship_filters(&mut count_qb, &filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((scholarships, total))
    }

    async fn top_scholarships(&self, limit: i64) -> StoreResult<Vec<Scholarship>> {
        let scholarships = sqlx::query_as::<_, Scholarship>(
            r#"
            SELECT * FROM scholarships
            ORDER BY application_fees ASC, created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(scholarships)
    }

    async fn update_scholarship(
        &self,
        id: Uuid,
        dto: UpdateScholarshipDto,
    ) -> StoreResult<Scholarship> {
        let scholarship = sqlx::query_as::<_, Scholarship>(
            r#"
            UPDATE scholarships
            SET name = COALESCE($2, name),
                university_name = COALESCE($3, university_name),
                university_image = COALESCE($4, university_image),
                university_country = COALESCE($5, university_country),
                university_city = COALESCE($6, university_city),
                university_rank = COALESCE($7, university_rank),
                subject_category = COALESCE($8, subject_category),
                category = COALESCE($9, category),
                degree = COALESCE($10, degree),
                tuition_fees = COALESCE($11, tuition_fees),
                application_fees = COALESCE($12, application_fees),
                service_charge = COALESCE($13, service_charge),
                application_deadline = COALESCE($14, application_deadline),
                description = COALESCE($15, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.university_name)
        .bind(&dto.university_image)
        .bind(&dto.university_country)
        .bind(&dto.university_city)
        .bind(dto.university_rank)
        .bind(&dto.subject_category)
        .bind(dto.category)
        .bind(dto.degree)
        .bind(dto.tuition_fees)
        .bind(dto.application_fees)
        .bind(dto.service_charge)
        .bind(dto.application_deadline)
        .bind(&dto.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("Scholarship"))?;

        Ok(scholarship)
    }

    async fn delete_scholarship(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM scholarships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Scholarship"));
        }

        Ok(())
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn insert_application(&self, new: NewApplication) -> StoreResult<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (
                scholarship_id, applicant_id, applicant_name, applicant_email,
                phone, photo_url, address, gender, degree, ssc_result, hsc_result, study_gap,
                university_name, scholarship_category, subject_category,
                application_fees, service_charge, payment_status, transaction_ref
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(new.scholarship_id)
        .bind(new.applicant_id)
        .bind(&new.applicant_name)
        .bind(new.applicant_email.to_lowercase())
        .bind(&new.draft.phone)
        .bind(&new.draft.photo_url)
        .bind(&new.draft.address)
        .bind(&new.draft.gender)
        .bind(&new.draft.degree)
        .bind(&new.draft.ssc_result)
        .bind(&new.draft.hsc_result)
        .bind(&new.draft.study_gap)
        .bind(&new.university_name)
        .bind(&new.scholarship_category)
        .bind(&new.subject_category)
        .bind(new.application_fees)
        .bind(new.service_charge)
        .bind(new.payment_status)
        .bind(&new.transaction_ref)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "You have already applied for this scholarship"))?;

        Ok(application)
    }

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let application =
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(application)
    }

    async fn find_application_for(
        &self,
        scholarship_id: Uuid,
        applicant_email: &str,
    ) -> StoreResult<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE scholarship_id = $1 AND applicant_email = LOWER($2)",
        )
        .bind(scholarship_id)
        .bind(applicant_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    async fn list_applications(&self) -> StoreResult<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    async fn list_applications_for_email(&self, email: &str) -> StoreResult<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE applicant_email = LOWER($1) ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    async fn set_application_review(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        feedback: Option<String>,
    ) -> StoreResult<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET application_status = $2,
                feedback = COALESCE($3, feedback),
                feedback_at = CASE WHEN $3 IS NOT NULL THEN NOW() ELSE feedback_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(&feedback)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("Application"))?;

        Ok(application)
    }

    async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> StoreResult<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET payment_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("Application"))?;

        Ok(application)
    }

    async fn update_application_draft(
        &self,
        id: Uuid,
        draft: ApplicationDraft,
    ) -> StoreResult<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET phone = COALESCE($2, phone),
                photo_url = COALESCE($3, photo_url),
                address = COALESCE($4, address),
                gender = COALESCE($5, gender),
                degree = COALESCE($6, degree),
                ssc_result = COALESCE($7, ssc_result),
                hsc_result = COALESCE($8, hsc_result),
                study_gap = COALESCE($9, study_gap),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.phone)
        .bind(&draft.photo_url)
        .bind(&draft.address)
        .bind(&draft.gender)
        .bind(&draft.degree)
        .bind(&draft.ssc_result)
        .bind(&draft.hsc_result)
        .bind(&draft.study_gap)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("Application"))?;

        Ok(application)
    }

    async fn mark_application_paid(
        &self,
        id: Uuid,
        transaction_ref: &str,
        draft: ApplicationDraft,
    ) -> StoreResult<Application> {
        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET payment_status = 'paid',
                transaction_ref = $2,
                phone = COALESCE($3, phone),
                photo_url = COALESCE($4, photo_url),
                address = COALESCE($5, address),
                gender = COALESCE($6, gender),
                degree = COALESCE($7, degree),
                ssc_result = COALESCE($8, ssc_result),
                hsc_result = COALESCE($9, hsc_result),
                study_gap = COALESCE($10, study_gap),
                updated_at = NOW()
            WHERE id = $1 AND payment_status = 'unpaid'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(transaction_ref)
        .bind(&draft.phone)
        .bind(&draft.photo_url)
        .bind(&draft.address)
        .bind(&draft.gender)
        .bind(&draft.degree)
        .bind(&draft.ssc_result)
        .bind(&draft.hsc_result)
        .bind(&draft.study_gap)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(application) => Ok(application),
            None => {
                let exists =
                    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
                        .bind(id)
                        .fetch_one(&self.pool)
                        .await?;

                if exists {
                    Err(StoreError::conflict(
                        "Payment has already been confirmed for this application",
                    ))
                } else {
                    Err(StoreError::not_found("Application"))
                }
            }
        }
    }

    async fn delete_application_if_pending(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            "DELETE FROM applications WHERE id = $1 AND application_status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;

            if exists {
                return Err(StoreError::conflict(
                    "Cannot delete an application that is already being processed",
                ));
            }
            return Err(StoreError::not_found("Application"));
        }

        Ok(())
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn insert_review(&self, new: NewReview) -> StoreResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                scholarship_id, scholarship_name, university_name,
                author_email, author_name, author_photo, rating, comment
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new.scholarship_id)
        .bind(&new.scholarship_name)
        .bind(&new.university_name)
        .bind(&new.author_email)
        .bind(&new.author_name)
        .bind(&new.author_photo)
        .bind(new.rating)
        .bind(&new.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    async fn find_review(&self, id: Uuid) -> StoreResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let reviews =
            sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(reviews)
    }

    async fn list_reviews_for_scholarship(&self, scholarship_id: Uuid) -> StoreResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE scholarship_id = $1 ORDER BY created_at DESC",
        )
        .bind(scholarship_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn list_reviews_by_author(&self, email: &str) -> StoreResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE author_email = LOWER($1) ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn update_review(&self, id: Uuid, dto: UpdateReviewDto) -> StoreResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = COALESCE($2, rating),
                comment = COALESCE($3, comment),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.rating)
        .bind(&dto.comment)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("Review"))?;

        Ok(review)
    }

    async fn delete_review(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Review"));
        }

        Ok(())
    }
}

#[async_trait]
impl RoleRequestStore for PgStore {
    async fn insert_role_request(&self, new: NewRoleRequest) -> StoreResult<RoleRequest> {
        let request = sqlx::query_as::<_, RoleRequest>(
            r#"
            INSERT INTO role_requests (
                account_id, email, display_name, current_role, requested_role, justification
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.account_id)
        .bind(&new.email)
        .bind(&new.display_name)
        .bind(new.current_role)
        .bind(new.requested_role)
        .bind(&new.justification)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "You already have a pending role request"))?;

        Ok(request)
    }

    async fn find_role_request(&self, id: Uuid) -> StoreResult<Option<RoleRequest>> {
        let request = sqlx::query_as::<_, RoleRequest>("SELECT * FROM role_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    async fn list_role_requests(&self) -> StoreResult<Vec<RoleRequest>> {
        let requests = sqlx::query_as::<_, RoleRequest>(
            "SELECT * FROM role_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn list_pending_role_requests(&self) -> StoreResult<Vec<RoleRequest>> {
        let requests = sqlx::query_as::<_, RoleRequest>(
            "SELECT * FROM role_requests WHERE status = 'Pending' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn list_role_requests_for(&self, account_id: Uuid) -> StoreResult<Vec<RoleRequest>> {
        let requests = sqlx::query_as::<_, RoleRequest>(
            "SELECT * FROM role_requests WHERE account_id = $1 ORDER BY created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn approve_role_request(
        &self,
        id: Uuid,
        reviewer: Uuid,
        response: String,
    ) -> StoreResult<RoleRequest> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, RoleRequest>(
            r#"
            UPDATE role_requests
            SET status = 'Approved', reviewed_by = $2, admin_response = $3, reviewed_at = NOW()
            WHERE id = $1 AND status = 'Pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewer)
        .bind(&response)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            tx.rollback().await?;
            return Err(self.reviewed_or_missing(id).await);
        };

        sqlx::query("UPDATE accounts SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(request.account_id)
            .bind(request.requested_role)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(request)
    }

    async fn reject_role_request(
        &self,
        id: Uuid,
        reviewer: Uuid,
        response: String,
    ) -> StoreResult<RoleRequest> {
        let request = sqlx::query_as::<_, RoleRequest>(
            r#"
            UPDATE role_requests
            SET status = 'Rejected', reviewed_by = $2, admin_response = $3, reviewed_at = NOW()
            WHERE id = $1 AND status = 'Pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewer)
        .bind(&response)
        .fetch_optional(&self.pool)
        .await?;

        match request {
            Some(request) => Ok(request),
            None => Err(self.reviewed_or_missing(id).await),
        }
    }
}

impl PgStore {
    /// Work out why a conditional role-request update matched nothing.
    async fn reviewed_or_missing(&self, id: Uuid) -> StoreError {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM role_requests WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;

        match exists {
            Ok(true) => StoreError::conflict("This role request has already been reviewed"),
            Ok(false) => StoreError::not_found("Role request"),
            Err(e) => StoreError::Backend(e),
        }
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn insert_contact(&self, dto: CreateContactDto) -> StoreResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (full_name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&dto.full_name)
        .bind(&dto.email)
        .bind(&dto.subject)
        .bind(&dto.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn find_contact(&self, id: Uuid) -> StoreResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contact)
    }

    async fn list_contacts(
        &self,
        status: Option<ContactStatus>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<Contact>, i64)> {
        let (contacts, total) = match status {
            Some(status) => {
                let contacts = sqlx::query_as::<_, Contact>(
                    r#"
                    SELECT * FROM contacts
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM contacts WHERE status = $1",
                )
                .bind(status)
                .fetch_one(&self.pool)
                .await?;

                (contacts, total)
            }
            None => {
                let contacts = sqlx::query_as::<_, Contact>(
                    "SELECT * FROM contacts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contacts")
                    .fetch_one(&self.pool)
                    .await?;

                (contacts, total)
            }
        };

        Ok((contacts, total))
    }

    async fn update_contact(&self, id: Uuid, patch: ContactPatch) -> StoreResult<Contact> {
        let responded_by = patch
            .response
            .as_ref()
            .map(|_| patch.responded_by.clone().unwrap_or_else(|| "Admin".to_string()));

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET status = COALESCE($2, status),
                response = COALESCE($3, response),
                responded_by = COALESCE($4, responded_by),
                responded_at = CASE WHEN $3 IS NOT NULL THEN NOW() ELSE responded_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.status)
        .bind(&patch.response)
        .bind(&responded_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::not_found("Contact message"))?;

        Ok(contact)
    }

    async fn delete_contact(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Contact message"));
        }

        Ok(())
    }

    async fn contact_stats(&self) -> StoreResult<ContactStats> {
        let by_status = sqlx::query_as::<_, ContactStatusCount>(
            "SELECT status, COUNT(*) AS count FROM contacts GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let count_for = |status: ContactStatus| {
            by_status
                .iter()
                .find(|c| c.status == status)
                .map(|c| c.count)
                .unwrap_or(0)
        };

        Ok(ContactStats {
            total: by_status.iter().map(|c| c.count).sum(),
            new: count_for(ContactStatus::New),
            replied: count_for(ContactStatus::Replied),
            by_status,
        })
    }
}

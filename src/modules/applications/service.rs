use tracing::{info, instrument};
use uuid::Uuid;

use crate::metrics::track_application_created;
use crate::middleware::role::CurrentUser;
use crate::modules::applications::model::{
    Application, ApplicationStatus, CreateApplicationDto, NewApplication, PaymentStatus,
    UpdatePaymentDto, UpdateStatusDto,
};
use crate::store::Store;
use crate::utils::errors::AppError;

pub struct ApplicationService;

impl ApplicationService {
    /// Submit a new application for a scholarship.
    ///
    /// Fee and university fields are snapshotted from the scholarship at
    /// submission time. The row starts `pending`/`unpaid`; the store's
    /// compound unique key turns a duplicate submission into a 409.
    #[instrument(skip(store, user, dto), fields(email = %user.email))]
    pub async fn submit(
        store: &dyn Store,
        user: &CurrentUser,
        dto: CreateApplicationDto,
    ) -> Result<Application, AppError> {
        let scholarship = store
            .find_scholarship(dto.scholarship_id)
            .await?
            .ok_or_else(|| AppError::not_found("Scholarship not found"))?;

        let new = NewApplication {
            scholarship_id: scholarship.id,
            applicant_id: user.account_id,
            applicant_name: user.display_name.clone(),
            applicant_email: user.email.clone(),
            draft: dto.draft,
            university_name: scholarship.university_name,
            scholarship_category: scholarship.category.to_string(),
            subject_category: scholarship.subject_category,
            application_fees: scholarship.application_fees,
            service_charge: scholarship.service_charge,
            payment_status: PaymentStatus::Unpaid,
            transaction_ref: None,
        };

        let application = store.insert_application(new).await?;

        info!(application_id = %application.id, "Application submitted");
        track_application_created();

        Ok(application)
    }

    #[instrument(skip(store))]
    pub async fn get_applications(store: &dyn Store) -> Result<Vec<Application>, AppError> {
        Ok(store.list_applications().await?)
    }

    #[instrument(skip(store))]
    pub async fn get_applications_for(
        store: &dyn Store,
        email: &str,
    ) -> Result<Vec<Application>, AppError> {
        Ok(store.list_applications_for_email(email).await?)
    }

    #[instrument(skip(store))]
    pub async fn get_application(store: &dyn Store, id: Uuid) -> Result<Application, AppError> {
        store
            .find_application(id)
            .await?
            .ok_or_else(|| AppError::not_found("Application not found"))
    }

    #[instrument(skip(store, dto))]
    pub async fn update_status(
        store: &dyn Store,
        id: Uuid,
        dto: UpdateStatusDto,
    ) -> Result<Application, AppError> {
        let status: ApplicationStatus = dto
            .application_status
            .parse()
            .map_err(AppError::bad_request)?;

        let application = store.set_application_review(id, status, dto.feedback).await?;

        info!(application_id = %id, status = %status, "Application status updated");

        Ok(application)
    }

    #[instrument(skip(store, dto))]
    pub async fn update_payment(
        store: &dyn Store,
        id: Uuid,
        dto: UpdatePaymentDto,
    ) -> Result<Application, AppError> {
        let status: PaymentStatus = dto.payment_status.parse().map_err(AppError::bad_request)?;

        Ok(store.set_payment_status(id, status).await?)
    }

    /// Delete the caller's own application, only while it is still
    /// pending. A reviewed application is a 409, a foreign one a 403.
    #[instrument(skip(store, user), fields(email = %user.email))]
    pub async fn delete_own(
        store: &dyn Store,
        user: &CurrentUser,
        id: Uuid,
    ) -> Result<(), AppError> {
        let application = Self::get_application(store, id).await?;

        if application.applicant_email != user.email {
            return Err(AppError::forbidden(
                "You can only delete your own applications",
            ));
        }

        store.delete_application_if_pending(id).await?;

        Ok(())
    }
}

use std::collections::HashMap;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::gateway::{CheckoutSession, CreateSessionRequest};
use crate::metrics::track_payment_confirmed;
use crate::middleware::role::CurrentUser;
use crate::modules::applications::model::{
    Application, ApplicationDraft, NewApplication, PaymentStatus,
};
use crate::modules::payments::model::{
    CheckoutSessionResponse, ConfirmPaymentDto, ConfirmPaymentResponse, CreateCheckoutDto,
    SaveUnpaidDto,
};
use crate::modules::scholarships::model::Scholarship;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct PaymentService;

impl PaymentService {
    /// Open a hosted-checkout session for a scholarship's fees.
    ///
    /// The amount is computed server-side from the scholarship row and
    /// converted to minor units; the session's metadata carries enough to
    /// reconcile the payment later without trusting the client.
    #[instrument(skip(state, user, dto), fields(email = %user.email))]
    pub async fn create_checkout(
        state: &AppState,
        user: &CurrentUser,
        dto: CreateCheckoutDto,
    ) -> Result<CheckoutSessionResponse, AppError> {
        let scholarship = Self::find_scholarship(state, dto.scholarship_id).await?;

        let total = scholarship.application_fees + scholarship.service_charge;
        let amount_minor = (total * 100.0).round() as i64;

        let mut metadata = HashMap::new();
        metadata.insert("scholarship_id".to_string(), scholarship.id.to_string());
        metadata.insert("account_id".to_string(), user.account_id.to_string());
        metadata.insert(
            "application_fees".to_string(),
            scholarship.application_fees.to_string(),
        );
        metadata.insert(
            "service_charge".to_string(),
            scholarship.service_charge.to_string(),
        );

        let session = state
            .gateway
            .create_checkout_session(CreateSessionRequest {
                amount_minor,
                currency: state.payment_config.currency.clone(),
                product_name: scholarship.name.clone(),
                product_description: Some(format!(
                    "Application fees for {}",
                    scholarship.university_name
                )),
                customer_email: user.email.clone(),
                success_url: state.payment_config.success_url(),
                cancel_url: state.payment_config.cancel_url(),
                metadata,
            })
            .await?;

        info!(session_id = %session.id, amount_minor, "Checkout session created");

        Ok(CheckoutSessionResponse {
            session_id: session.id,
            checkout_url: session.url,
        })
    }

    /// Reconcile a completed checkout session with the application record.
    ///
    /// The session is keyed by (scholarship, customer email), which
    /// collapses "user abandoned checkout and re-applied" and "user
    /// completed checkout" into one canonical row:
    ///
    /// - an already paid row means this session (or a twin) was
    ///   confirmed before → 409, never a second side effect;
    /// - an unpaid row is flipped paid in place, conditionally, so a
    ///   racing confirmation loses with a 409;
    /// - no row at all gets a fresh paid application from the session's
    ///   metadata and the caller's draft.
    #[instrument(skip(state, user, dto), fields(email = %user.email))]
    pub async fn confirm_payment(
        state: &AppState,
        user: &CurrentUser,
        dto: ConfirmPaymentDto,
    ) -> Result<ConfirmPaymentResponse, AppError> {
        let session = state.gateway.retrieve_session(&dto.session_id).await?;

        if !session.is_paid() {
            return Err(AppError::bad_request(format!(
                "Payment has not been completed; the session reports '{}'",
                session.payment_status
            )));
        }

        let scholarship_id = session
            .metadata
            .get("scholarship_id")
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| {
                warn!(session_id = %session.id, "Session metadata has no usable scholarship_id");
                AppError::bad_request("The payment session is missing scholarship details")
            })?;

        let applicant_email = session
            .customer_email
            .clone()
            .unwrap_or_else(|| user.email.clone())
            .to_lowercase();

        let transaction_ref = session
            .payment_intent
            .clone()
            .unwrap_or_else(|| session.id.clone());

        let existing = state
            .store
            .find_application_for(scholarship_id, &applicant_email)
            .await?;

        let application = match existing {
            Some(application) if application.payment_status == PaymentStatus::Paid => {
                return Err(AppError::conflict(
                    "Payment has already been confirmed for this application",
                ));
            }
            Some(application) => {
                state
                    .store
                    .mark_application_paid(application.id, &transaction_ref, dto.draft)
                    .await?
            }
            None => {
                Self::insert_paid_application(
                    state,
                    user,
                    scholarship_id,
                    &applicant_email,
                    &transaction_ref,
                    dto.draft,
                )
                .await?
            }
        };

        info!(
            application_id = %application.id,
            transaction_ref = %transaction_ref,
            "Payment confirmed"
        );
        track_payment_confirmed();

        Ok(Self::confirmation_response(application, &session))
    }

    /// Save the caller's application without a completed payment.
    ///
    /// Upserts on (scholarship, email): an existing row keeps its payment
    /// state and only merges draft fields; a new row starts unpaid.
    /// Returns whether a row was created so the controller can answer
    /// 201 vs 200.
    #[instrument(skip(state, user, dto), fields(email = %user.email))]
    pub async fn save_unpaid(
        state: &AppState,
        user: &CurrentUser,
        dto: SaveUnpaidDto,
    ) -> Result<(Application, bool), AppError> {
        let scholarship = Self::find_scholarship(state, dto.scholarship_id).await?;

        let existing = state
            .store
            .find_application_for(scholarship.id, &user.email)
            .await?;

        if let Some(application) = existing {
            let application = state
                .store
                .update_application_draft(application.id, dto.draft)
                .await?;

            return Ok((application, false));
        }

        let application = state
            .store
            .insert_application(Self::new_application(
                user,
                &scholarship,
                &user.email,
                dto.draft,
                PaymentStatus::Unpaid,
                None,
            ))
            .await?;

        Ok((application, true))
    }

    async fn insert_paid_application(
        state: &AppState,
        user: &CurrentUser,
        scholarship_id: Uuid,
        applicant_email: &str,
        transaction_ref: &str,
        draft: ApplicationDraft,
    ) -> Result<Application, AppError> {
        let scholarship = Self::find_scholarship(state, scholarship_id).await?;

        let application = state
            .store
            .insert_application(Self::new_application(
                user,
                &scholarship,
                applicant_email,
                draft,
                PaymentStatus::Paid,
                Some(transaction_ref.to_string()),
            ))
            .await?;

        Ok(application)
    }

    fn new_application(
        user: &CurrentUser,
        scholarship: &Scholarship,
        applicant_email: &str,
        draft: ApplicationDraft,
        payment_status: PaymentStatus,
        transaction_ref: Option<String>,
    ) -> NewApplication {
        NewApplication {
            scholarship_id: scholarship.id,
            applicant_id: user.account_id,
            applicant_name: user.display_name.clone(),
            applicant_email: applicant_email.to_string(),
            draft,
            university_name: scholarship.university_name.clone(),
            scholarship_category: scholarship.category.to_string(),
            subject_category: scholarship.subject_category.clone(),
            application_fees: scholarship.application_fees,
            service_charge: scholarship.service_charge,
            payment_status,
            transaction_ref,
        }
    }

    fn confirmation_response(
        application: Application,
        session: &CheckoutSession,
    ) -> ConfirmPaymentResponse {
        ConfirmPaymentResponse {
            transaction_ref: application.transaction_ref.clone(),
            amount_paid: session.amount_total.map(|a| a as f64 / 100.0),
            currency: session.currency.clone(),
            application,
        }
    }

    async fn find_scholarship(state: &AppState, id: Uuid) -> Result<Scholarship, AppError> {
        state
            .store
            .find_scholarship(id)
            .await?
            .ok_or_else(|| AppError::not_found("Scholarship not found"))
    }
}

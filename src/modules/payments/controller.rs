use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::middleware::role::RequireStudent;
use crate::modules::applications::model::Application;
use crate::modules::payments::model::{
    CheckoutSessionResponse, ConfirmPaymentDto, ConfirmPaymentResponse, CreateCheckoutDto,
    SaveUnpaidDto,
};
use crate::modules::payments::service::PaymentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/payments/create-checkout",
    request_body = CreateCheckoutDto,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutSessionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only"),
        (status = 404, description = "Scholarship not found"),
        (status = 502, description = "Payment provider error"),
        (status = 503, description = "Payment gateway not configured")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student, dto))]
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateCheckoutDto>,
) -> Result<Json<CheckoutSessionResponse>, AppError> {
    let session = PaymentService::create_checkout(&state, &student, dto).await?;

    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/payments/confirm-payment",
    request_body = ConfirmPaymentDto,
    responses(
        (status = 200, description = "Payment recorded on the application", body = ConfirmPaymentResponse),
        (status = 400, description = "Session not paid, or malformed session metadata"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only"),
        (status = 409, description = "Payment already confirmed"),
        (status = 502, description = "Payment provider error"),
        (status = 503, description = "Payment gateway not configured")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student, dto))]
pub async fn confirm_payment(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<ConfirmPaymentDto>,
) -> Result<Json<ConfirmPaymentResponse>, AppError> {
    let confirmation = PaymentService::confirm_payment(&state, &student, dto).await?;

    Ok(Json(confirmation))
}

#[utoipa::path(
    post,
    path = "/api/payments/save-unpaid",
    request_body = SaveUnpaidDto,
    responses(
        (status = 201, description = "Unpaid application saved", body = Application),
        (status = 200, description = "Existing application updated", body = Application),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Students only"),
        (status = 404, description = "Scholarship not found")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, student, dto))]
pub async fn save_unpaid(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<SaveUnpaidDto>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let (application, created) = PaymentService::save_unpaid(&state, &student, dto).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(application)))
}

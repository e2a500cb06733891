//! Payment flow DTOs.
//!
//! Payment runs through the provider's hosted checkout: the server
//! creates a session, the client pays on the provider's page, then calls
//! back with the session id for confirmation. Amounts are computed
//! server-side from the scholarship's fees; the client never sends one.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::applications::model::{Application, ApplicationDraft};

/// DTO for creating a hosted-checkout session.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCheckoutDto {
    pub scholarship_id: Uuid,
}

/// Response for a freshly created checkout session.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub checkout_url: Option<String>,
}

/// DTO for confirming a completed checkout session.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ConfirmPaymentDto {
    #[validate(length(min = 1))]
    pub session_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub draft: ApplicationDraft,
}

/// Response after a confirmed payment.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ConfirmPaymentResponse {
    pub application: Application,
    pub transaction_ref: Option<String>,
    /// Amount charged, in major currency units.
    pub amount_paid: Option<f64>,
    pub currency: Option<String>,
}

/// DTO for saving an application before payment completes.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct SaveUnpaidDto {
    pub scholarship_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub draft: ApplicationDraft,
}

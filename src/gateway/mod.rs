//! Hosted-checkout payment gateway.
//!
//! Fees are collected through the provider's hosted checkout pages: the
//! backend creates a session, the client completes payment on the provider's
//! page, then calls back with the session id so the server can verify the
//! session's state and record the payment. [`PaymentGateway`] is the seam in
//! front of the provider's sessions API.

use std::collections::HashMap;

use async_trait::async_trait;

pub mod http;
#[cfg(feature = "test-utils")]
pub mod stub;

pub use http::HttpPaymentGateway;

/// Parameters for a new hosted-checkout session.
#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    /// Total amount in minor currency units (cents).
    pub amount_minor: i64,
    pub currency: String,
    pub product_name: String,
    pub product_description: Option<String>,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: HashMap<String, String>,
}

/// A checkout session as reported by the provider.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page URL; present on freshly created sessions.
    pub url: Option<String>,
    /// Provider vocabulary: `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: String,
    pub payment_intent: Option<String>,
    /// Total charged, in minor currency units.
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment gateway is not configured")]
    NotConfigured,
    #[error("Payment gateway error: {0}")]
    Api(String),
    #[error("Payment gateway unreachable: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError>;
}

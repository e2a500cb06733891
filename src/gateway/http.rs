use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::config::payment::PaymentConfig;
use crate::gateway::{CheckoutSession, CreateSessionRequest, PaymentError, PaymentGateway};

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
    payment_status: String,
    payment_intent: Option<String>,
    amount_total: Option<i64>,
    currency: Option<String>,
    customer_email: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl From<SessionResponse> for CheckoutSession {
    fn from(s: SessionResponse) -> Self {
        CheckoutSession {
            id: s.id,
            url: s.url,
            payment_status: s.payment_status,
            payment_intent: s.payment_intent,
            amount_total: s.amount_total,
            currency: s.currency,
            customer_email: s.customer_email,
            metadata: s.metadata,
        }
    }
}

/// [`PaymentGateway`] over the provider's checkout-sessions REST API.
///
/// Session creation is a form-encoded `POST /v1/checkout/sessions`
/// authenticated with the secret key; retrieval is a
/// `GET /v1/checkout/sessions/{id}`. The API base is configurable so tests
/// can point the client at a local mock server.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl HttpPaymentGateway {
    pub fn new(config: PaymentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    fn secret_key(&self) -> Result<&str, PaymentError> {
        self.config
            .secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured)
    }

    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<CheckoutSession, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("{}: {}", status, body.trim()));
            warn!(status = %status, "Checkout API call failed");
            return Err(PaymentError::Api(message));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Api(format!("malformed session response: {e}")))?;

        Ok(session.into())
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let key = self.secret_key()?;

        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("line_items[0][quantity]".into(), "1".into()),
            (
                "line_items[0][price_data][currency]".into(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".into(),
                request.amount_minor.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                request.product_name.clone(),
            ),
            ("customer_email".into(), request.customer_email.clone()),
            ("success_url".into(), request.success_url.clone()),
            ("cancel_url".into(), request.cancel_url.clone()),
        ];

        if let Some(description) = &request.product_description {
            form.push((
                "line_items[0][price_data][product_data][description]".into(),
                description.clone(),
            ));
        }

        for (k, v) in &request.metadata {
            form.push((format!("metadata[{k}]"), v.clone()));
        }

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.config.api_base))
            .bearer_auth(key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Unreachable(e.to_string()))?;

        Self::handle_response(response).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        let key = self.secret_key()?;

        let response = self
            .client
            .get(format!(
                "{}/v1/checkout/sessions/{}",
                self.config.api_base, session_id
            ))
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| PaymentError::Unreachable(e.to_string()))?;

        Self::handle_response(response).await
    }
}

//! Scripted gateway for tests: sessions are seeded up front and create
//! calls are recorded for assertions.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::gateway::{CheckoutSession, CreateSessionRequest, PaymentError, PaymentGateway};

#[derive(Default)]
pub struct FakePaymentGateway {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    created: Mutex<Vec<CreateSessionRequest>>,
    configured: bool,
}

impl FakePaymentGateway {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            configured: true,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            configured: false,
        }
    }

    /// Seed a session the gateway will hand back from `retrieve_session`.
    pub fn add_session(&self, session: CheckoutSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session);
    }

    /// Requests passed to `create_checkout_session`, in call order.
    pub fn created_requests(&self) -> Vec<CreateSessionRequest> {
        self.created.lock().unwrap().clone()
    }

    /// Convenience builder for a completed (paid) session.
    pub fn paid_session(
        id: &str,
        customer_email: &str,
        amount_total: i64,
        metadata: HashMap<String, String>,
    ) -> CheckoutSession {
        CheckoutSession {
            id: id.to_string(),
            url: None,
            payment_status: "paid".to_string(),
            payment_intent: Some(format!("pi_{id}")),
            amount_total: Some(amount_total),
            currency: Some("usd".to_string()),
            customer_email: Some(customer_email.to_string()),
            metadata,
        }
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_checkout_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if !self.configured {
            return Err(PaymentError::NotConfigured);
        }

        let mut created = self.created.lock().unwrap();
        let id = format!("cs_test_{}", created.len() + 1);
        created.push(request.clone());

        let session = CheckoutSession {
            id: id.clone(),
            url: Some(format!("https://checkout.test/pay/{id}")),
            payment_status: "unpaid".to_string(),
            payment_intent: None,
            amount_total: Some(request.amount_minor),
            currency: Some(request.currency),
            customer_email: Some(request.customer_email),
            metadata: request.metadata,
        };

        self.sessions
            .lock()
            .unwrap()
            .insert(id, session.clone());

        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        if !self.configured {
            return Err(PaymentError::NotConfigured);
        }

        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::Api(format!("No such checkout session: {session_id}")))
    }
}

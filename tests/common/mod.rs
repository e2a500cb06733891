#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use scholarstream::config::cors::CorsConfig;
use scholarstream::config::payment::PaymentConfig;
use scholarstream::config::server::ServerConfig;
use scholarstream::gateway::stub::FakePaymentGateway;
use scholarstream::identity::VerifiedClaim;
use scholarstream::identity::stub::StaticTokenVerifier;
use scholarstream::modules::users::model::{NewAccount, Role};
use scholarstream::router::init_router;
use scholarstream::state::AppState;
use scholarstream::store::{AccountStore, MemStore};

/// A full router wired against in-memory fakes.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemStore>,
    pub gateway: Arc<FakePaymentGateway>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            verifier: StaticTokenVerifier::new(),
            accounts: Vec::new(),
            gateway_configured: true,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<axum::body::Body> {
        self.request(build_request("GET", uri, token, None)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<axum::body::Body> {
        self.request(build_request("DELETE", uri, token, None)).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<axum::body::Body> {
        self.request(build_request("POST", uri, token, Some(body)))
            .await
    }

    pub async fn patch_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<axum::body::Body> {
        self.request(build_request("PATCH", uri, token, Some(body)))
            .await
    }

    pub async fn put_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<axum::body::Body> {
        self.request(build_request("PUT", uri, token, Some(body)))
            .await
    }
}

pub struct TestAppBuilder {
    verifier: StaticTokenVerifier,
    accounts: Vec<(String, String, Role)>,
    gateway_configured: bool,
}

impl TestAppBuilder {
    /// Register a token the verifier vouches for, without an account row.
    pub fn token(mut self, token: &str, email: &str, name: &str) -> Self {
        self.verifier.insert(token, claim_for(email, name));
        self
    }

    /// Register a token plus a stored account at the given role.
    pub fn account(mut self, token: &str, email: &str, name: &str, role: Role) -> Self {
        self.verifier.insert(token, claim_for(email, name));
        self.accounts
            .push((email.to_string(), name.to_string(), role));
        self
    }

    /// Build with a verifier that reports the not-configured fault.
    pub fn unconfigured_verifier(mut self) -> Self {
        self.verifier = StaticTokenVerifier::unconfigured();
        self
    }

    pub fn unconfigured_gateway(mut self) -> Self {
        self.gateway_configured = false;
        self
    }

    pub async fn build(self) -> TestApp {
        let store = Arc::new(MemStore::new());
        let gateway = Arc::new(if self.gateway_configured {
            FakePaymentGateway::new()
        } else {
            FakePaymentGateway::unconfigured()
        });

        for (email, name, role) in &self.accounts {
            store
                .upsert_account(NewAccount {
                    email: email.clone(),
                    display_name: name.clone(),
                    photo_url: None,
                    external_subject: format!("sub-{email}"),
                    role: *role,
                })
                .await
                .unwrap();
        }

        let state = AppState {
            store: store.clone(),
            verifier: Arc::new(self.verifier),
            gateway: gateway.clone(),
            payment_config: PaymentConfig::default(),
            cors_config: CorsConfig::default(),
            server_config: ServerConfig::default(),
        };

        TestApp {
            router: init_router(state),
            store,
            gateway,
        }
    }
}

pub fn claim_for(email: &str, name: &str) -> VerifiedClaim {
    VerifiedClaim {
        subject: format!("sub-{email}"),
        email: email.to_lowercase(),
        name: Some(name.to_string()),
        picture: None,
    }
}

fn build_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<axum::body::Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn assert_error(
    response: Response<axum::body::Body>,
    status: StatusCode,
    message_contains: &str,
) {
    assert_eq!(response.status(), status);
    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap_or_default();
    assert!(
        message.contains(message_contains),
        "expected error containing {message_contains:?}, got {message:?}"
    );
}

//! Tests for the HTTP clients behind the identity and payment seams,
//! exercised against a local mock server.

use scholarstream::config::identity::IdentityConfig;
use scholarstream::config::payment::PaymentConfig;
use scholarstream::gateway::{
    CreateSessionRequest, HttpPaymentGateway, PaymentError, PaymentGateway,
};
use scholarstream::identity::{HttpTokenVerifier, IdentityError, TokenVerifier};
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn identity_config(server: &MockServer, audience: Option<&str>) -> IdentityConfig {
    IdentityConfig {
        verify_url: Some(format!("{}/tokeninfo", server.uri())),
        audience: audience.map(String::from),
        timeout_secs: 5,
    }
}

fn payment_config(server: &MockServer) -> PaymentConfig {
    PaymentConfig {
        secret_key: Some("sk_test_123".to_string()),
        api_base: server.uri(),
        ..PaymentConfig::default()
    }
}

fn session_request(amount_minor: i64) -> CreateSessionRequest {
    CreateSessionRequest {
        amount_minor,
        currency: "usd".to_string(),
        product_name: "Test Grant".to_string(),
        product_description: None,
        customer_email: "s@test.com".to_string(),
        success_url: "http://localhost/success".to_string(),
        cancel_url: "http://localhost/cancel".to_string(),
        metadata: Default::default(),
    }
}

#[tokio::test]
async fn verifier_accepts_a_valid_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .and(query_param("id_token", "good-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "provider-sub-1",
            "email": "Upper.Case@Test.com",
            "name": "Test User",
            "picture": "https://img.test/u.png",
            "aud": "client-123"
        })))
        .mount(&server)
        .await;

    let verifier = HttpTokenVerifier::new(identity_config(&server, Some("client-123")));
    let claim = verifier.verify("good-token").await.unwrap();

    assert_eq!(claim.subject, "provider-sub-1");
    // Emails are normalized to lowercase at the seam
    assert_eq!(claim.email, "upper.case@test.com");
    assert_eq!(claim.name.as_deref(), Some("Test User"));
}

#[tokio::test]
async fn verifier_rejects_a_provider_4xx() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_token"
        })))
        .mount(&server)
        .await;

    let verifier = HttpTokenVerifier::new(identity_config(&server, None));
    let err = verifier.verify("bad-token").await.unwrap_err();

    assert!(matches!(err, IdentityError::InvalidToken(_)));
}

#[tokio::test]
async fn verifier_rejects_audience_mismatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "provider-sub-1",
            "email": "u@test.com",
            "aud": "someone-elses-client"
        })))
        .mount(&server)
        .await;

    let verifier = HttpTokenVerifier::new(identity_config(&server, Some("client-123")));
    let err = verifier.verify("token").await.unwrap_err();

    match err {
        IdentityError::InvalidToken(message) => assert!(message.contains("audience")),
        other => panic!("expected InvalidToken, got {other:?}"),
    }
}

#[tokio::test]
async fn verifier_requires_an_email_claim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "provider-sub-1"
        })))
        .mount(&server)
        .await;

    let verifier = HttpTokenVerifier::new(identity_config(&server, None));
    let err = verifier.verify("token").await.unwrap_err();

    match err {
        IdentityError::InvalidToken(message) => assert!(message.contains("email")),
        other => panic!("expected InvalidToken, got {other:?}"),
    }
}

#[tokio::test]
async fn verifier_without_a_url_is_not_configured() {
    let verifier = HttpTokenVerifier::new(IdentityConfig::default());
    let err = verifier.verify("token").await.unwrap_err();

    assert!(matches!(err, IdentityError::NotConfigured));
}

#[tokio::test]
async fn gateway_creates_a_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(bearer_token("sk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_live_1",
            "url": "https://checkout.provider/pay/cs_live_1",
            "payment_status": "unpaid",
            "payment_intent": null,
            "amount_total": 11000,
            "currency": "usd",
            "customer_email": "s@test.com"
        })))
        .mount(&server)
        .await;

    let gateway = HttpPaymentGateway::new(payment_config(&server));
    let session = gateway
        .create_checkout_session(session_request(11_000))
        .await
        .unwrap();

    assert_eq!(session.id, "cs_live_1");
    assert_eq!(
        session.url.as_deref(),
        Some("https://checkout.provider/pay/cs_live_1")
    );
    assert!(!session.is_paid());
}

#[tokio::test]
async fn gateway_retrieves_a_paid_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_live_2"))
        .and(bearer_token("sk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_live_2",
            "url": null,
            "payment_status": "paid",
            "payment_intent": "pi_456",
            "amount_total": 5000,
            "currency": "usd",
            "customer_email": "s@test.com",
            "metadata": { "scholarship_id": "abc" }
        })))
        .mount(&server)
        .await;

    let gateway = HttpPaymentGateway::new(payment_config(&server));
    let session = gateway.retrieve_session("cs_live_2").await.unwrap();

    assert!(session.is_paid());
    assert_eq!(session.payment_intent.as_deref(), Some("pi_456"));
    assert_eq!(session.metadata.get("scholarship_id").unwrap(), "abc");
}

#[tokio::test]
async fn gateway_surfaces_the_providers_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "message": "No such checkout.session: cs_gone" }
        })))
        .mount(&server)
        .await;

    let gateway = HttpPaymentGateway::new(payment_config(&server));
    let err = gateway.retrieve_session("cs_gone").await.unwrap_err();

    match err {
        PaymentError::Api(message) => assert!(message.contains("No such checkout.session")),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn gateway_without_a_key_is_not_configured() {
    let gateway = HttpPaymentGateway::new(PaymentConfig::default());
    let err = gateway.retrieve_session("cs_any").await.unwrap_err();

    assert!(matches!(err, PaymentError::NotConfigured));
}

mod common;

use std::collections::HashMap;

use axum::http::StatusCode;
use common::{TestApp, assert_error, body_json};
use scholarstream::gateway::stub::FakePaymentGateway;
use scholarstream::modules::users::model::Role;
use serde_json::json;

fn app_builder() -> common::TestAppBuilder {
    TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .account("student-token", "s@test.com", "Student", Role::Student)
}

async fn seed_scholarship(app: &TestApp, fees: f64, charge: f64) -> String {
    let response = app
        .post_json(
            "/api/scholarships",
            Some("admin-token"),
            json!({
                "name": "Checkout Grant",
                "university_name": "ETH Zurich",
                "university_country": "Switzerland",
                "category": "Full Fund",
                "degree": "Masters",
                "application_fees": fees,
                "service_charge": charge,
                "application_deadline": "2027-03-15T00:00:00Z"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

fn paid_session_metadata(scholarship_id: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert("scholarship_id".to_string(), scholarship_id.to_string());
    metadata
}

#[tokio::test]
async fn checkout_amount_is_computed_server_side() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, 100.0, 10.0).await;

    let response = app
        .post_json(
            "/api/payments/create-checkout",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["session_id"], "cs_test_1");
    assert!(body["checkout_url"].as_str().unwrap().starts_with("https://"));

    let requests = app.gateway.created_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount_minor, 11_000);
    assert_eq!(requests[0].currency, "usd");
    assert_eq!(requests[0].customer_email, "s@test.com");
    assert_eq!(
        requests[0].metadata.get("scholarship_id").unwrap(),
        &scholarship_id
    );
    assert!(requests[0].metadata.contains_key("account_id"));
    assert_eq!(
        requests[0].metadata.get("application_fees").unwrap(),
        "100"
    );
    assert_eq!(requests[0].metadata.get("service_charge").unwrap(), "10");
}

#[tokio::test]
async fn checkout_for_unknown_scholarship_is_404() {
    let app = app_builder().build().await;

    let response = app
        .post_json(
            "/api/payments/create-checkout",
            Some("student-token"),
            json!({ "scholarship_id": "00000000-0000-0000-0000-000000000000" }),
        )
        .await;

    assert_error(response, StatusCode::NOT_FOUND, "Scholarship not found").await;
}

#[tokio::test]
async fn unconfigured_gateway_reports_service_unavailable() {
    let app = app_builder().unconfigured_gateway().build().await;
    let scholarship_id = seed_scholarship(&app, 50.0, 5.0).await;

    let response = app
        .post_json(
            "/api/payments/create-checkout",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id }),
        )
        .await;

    assert_error(response, StatusCode::SERVICE_UNAVAILABLE, "not configured").await;
}

#[tokio::test]
async fn confirmation_creates_a_paid_application() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, 100.0, 10.0).await;

    app.gateway.add_session(FakePaymentGateway::paid_session(
        "cs_done",
        "s@test.com",
        11_000,
        paid_session_metadata(&scholarship_id),
    ));

    let response = app
        .post_json(
            "/api/payments/confirm-payment",
            Some("student-token"),
            json!({ "session_id": "cs_done", "phone": "0123456789" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["transaction_ref"], "pi_cs_done");
    assert_eq!(body["amount_paid"], 110.0);
    assert_eq!(body["currency"], "usd");
    assert_eq!(body["application"]["payment_status"], "paid");
    assert_eq!(body["application"]["applicant_email"], "s@test.com");
    assert_eq!(body["application"]["phone"], "0123456789");
}

#[tokio::test]
async fn confirmation_flips_an_existing_unpaid_row() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, 40.0, 10.0).await;

    // The student saved a draft before paying
    let response = app
        .post_json(
            "/api/payments/save-unpaid",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id, "address": "12 Main St" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved = body_json(response).await;
    assert_eq!(saved["payment_status"], "unpaid");

    app.gateway.add_session(FakePaymentGateway::paid_session(
        "cs_flip",
        "s@test.com",
        5_000,
        paid_session_metadata(&scholarship_id),
    ));

    let response = app
        .post_json(
            "/api/payments/confirm-payment",
            Some("student-token"),
            json!({ "session_id": "cs_flip" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // The saved row was flipped, not duplicated
    assert_eq!(body["application"]["id"], saved["id"]);
    assert_eq!(body["application"]["payment_status"], "paid");
    assert_eq!(body["application"]["address"], "12 Main St");
    assert_eq!(body["application"]["transaction_ref"], "pi_cs_flip");
}

#[tokio::test]
async fn double_confirmation_is_a_conflict() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, 40.0, 10.0).await;

    app.gateway.add_session(FakePaymentGateway::paid_session(
        "cs_once",
        "s@test.com",
        5_000,
        paid_session_metadata(&scholarship_id),
    ));

    let response = app
        .post_json(
            "/api/payments/confirm-payment",
            Some("student-token"),
            json!({ "session_id": "cs_once" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_json(
            "/api/payments/confirm-payment",
            Some("student-token"),
            json!({ "session_id": "cs_once" }),
        )
        .await;
    assert_error(response, StatusCode::CONFLICT, "already been confirmed").await;
}

#[tokio::test]
async fn unpaid_session_cannot_be_confirmed() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, 40.0, 10.0).await;

    // The fake hands back freshly created sessions as unpaid
    let response = app
        .post_json(
            "/api/payments/create-checkout",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id }),
        )
        .await;
    let session_id = body_json(response).await["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .post_json(
            "/api/payments/confirm-payment",
            Some("student-token"),
            json!({ "session_id": session_id }),
        )
        .await;

    assert_error(response, StatusCode::BAD_REQUEST, "has not been completed").await;
}

#[tokio::test]
async fn session_without_scholarship_metadata_is_rejected() {
    let app = app_builder().build().await;

    app.gateway.add_session(FakePaymentGateway::paid_session(
        "cs_bare",
        "s@test.com",
        5_000,
        HashMap::new(),
    ));

    let response = app
        .post_json(
            "/api/payments/confirm-payment",
            Some("student-token"),
            json!({ "session_id": "cs_bare" }),
        )
        .await;

    assert_error(
        response,
        StatusCode::BAD_REQUEST,
        "missing scholarship details",
    )
    .await;
}

#[tokio::test]
async fn unknown_session_is_a_gateway_error() {
    let app = app_builder().build().await;

    let response = app
        .post_json(
            "/api/payments/confirm-payment",
            Some("student-token"),
            json!({ "session_id": "cs_missing" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn save_unpaid_upserts_on_scholarship_and_email() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, 40.0, 10.0).await;

    let response = app
        .post_json(
            "/api/payments/save-unpaid",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id, "phone": "111" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;
    assert_eq!(first["payment_status"], "unpaid");
    assert_eq!(first["phone"], "111");

    let response = app
        .post_json(
            "/api/payments/save-unpaid",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id, "address": "Elsewhere" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["id"], first["id"]);
    // Draft fields merge; earlier values survive
    assert_eq!(second["phone"], "111");
    assert_eq!(second["address"], "Elsewhere");
}

#[tokio::test]
async fn payment_endpoints_are_student_only() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, 40.0, 10.0).await;

    let response = app
        .post_json(
            "/api/payments/create-checkout",
            Some("admin-token"),
            json!({ "scholarship_id": scholarship_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

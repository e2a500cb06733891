mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error};
use scholarstream::modules::users::model::Role;

#[tokio::test]
async fn missing_authorization_header_is_401() {
    let app = TestApp::builder().build().await;

    let response = app.get("/api/users", None).await;

    assert_error(
        response,
        StatusCode::UNAUTHORIZED,
        "Missing authorization header",
    )
    .await;
}

#[tokio::test]
async fn malformed_authorization_header_is_401() {
    let app = TestApp::builder().build().await;

    let response = app
        .request(
            axum::http::Request::builder()
                .method("GET")
                .uri("/api/users")
                .header("authorization", "Basic abc123")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;

    assert_error(
        response,
        StatusCode::UNAUTHORIZED,
        "Invalid authorization header format",
    )
    .await;
}

#[tokio::test]
async fn unknown_token_is_401() {
    let app = TestApp::builder().build().await;

    let response = app.get("/api/users", Some("nope")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_verifier_is_503() {
    let app = TestApp::builder().unconfigured_verifier().build().await;

    let response = app.get("/api/users", Some("any-token")).await;

    assert_error(
        response,
        StatusCode::SERVICE_UNAVAILABLE,
        "not configured",
    )
    .await;
}

#[tokio::test]
async fn verified_token_without_account_is_404() {
    let app = TestApp::builder()
        .token("ghost-token", "ghost@test.com", "Ghost")
        .build()
        .await;

    let response = app.get("/api/users", Some("ghost-token")).await;

    assert_error(
        response,
        StatusCode::NOT_FOUND,
        "This account is not registered",
    )
    .await;
}

#[tokio::test]
async fn student_cannot_reach_admin_route() {
    let app = TestApp::builder()
        .account("student-token", "s@test.com", "Student", Role::Student)
        .build()
        .await;

    let response = app.get("/api/users", Some("student-token")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn moderator_cannot_reach_admin_route() {
    let app = TestApp::builder()
        .account("mod-token", "m@test.com", "Mod", Role::Moderator)
        .build()
        .await;

    let response = app.get("/api/users", Some("mod-token")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_passes_admin_guard() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .build()
        .await;

    let response = app.get("/api/users", Some("admin-token")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_satisfies_moderator_guard() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .build()
        .await;

    // /api/applications is a moderator listing
    let response = app.get("/api/applications", Some("admin-token")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn moderator_cannot_use_student_route() {
    let app = TestApp::builder()
        .account("mod-token", "m@test.com", "Mod", Role::Moderator)
        .build()
        .await;

    let response = app
        .post_json(
            "/api/applications",
            Some("mod-token"),
            serde_json::json!({ "scholarship_id": uuid::Uuid::new_v4() }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn credential_check_precedes_account_lookup() {
    // An unknown token on a guarded route answers 401, never 404,
    // even though no account exists either.
    let app = TestApp::builder().build().await;

    let response = app.get("/api/applications", Some("bad-token")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

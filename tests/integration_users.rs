mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error, body_json};
use scholarstream::modules::users::model::Role;
use serde_json::json;

#[tokio::test]
async fn first_sync_creates_student_account() {
    let app = TestApp::builder()
        .token("new-token", "New.Student@Test.com", "New Student")
        .build()
        .await;

    let response = app
        .post_json(
            "/api/users/create-or-update",
            Some("new-token"),
            json!({ "name": "New Student" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], "new.student@test.com");
    assert_eq!(body["role"], "Student");
    assert!(body.get("external_subject").is_none());
}

#[tokio::test]
async fn second_sync_refreshes_and_keeps_role() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Old Name", Role::Admin)
        .build()
        .await;

    let response = app
        .post_json(
            "/api/users/create-or-update",
            Some("admin-token"),
            json!({ "name": "Fresh Name" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["display_name"], "Fresh Name");
    // An existing elevated role survives re-sync
    assert_eq!(body["role"], "Admin");
}

#[tokio::test]
async fn sync_requires_a_token() {
    let app = TestApp::builder().build().await;

    let response = app
        .post_json("/api/users/create-or-update", None, json!({ "name": "X" }))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sync_rejects_empty_name() {
    let app = TestApp::builder()
        .token("t", "x@test.com", "X")
        .build()
        .await;

    let response = app
        .post_json(
            "/api/users/create-or-update",
            Some("t"),
            json!({ "name": "" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_lookup_defaults_to_student_for_unknown_email() {
    let app = TestApp::builder().build().await;

    let response = app.get("/api/users/nobody@test.com/role", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "Student");
}

#[tokio::test]
async fn role_lookup_reports_stored_role() {
    let app = TestApp::builder()
        .account("mod-token", "m@test.com", "Mod", Role::Moderator)
        .build()
        .await;

    let response = app.get("/api/users/m@test.com/role", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "Moderator");
}

#[tokio::test]
async fn admin_updates_role_directly() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .account("student-token", "s@test.com", "Student", Role::Student)
        .build()
        .await;

    let account = app
        .store
        .find_account_by_email_for_test("s@test.com")
        .await;

    let response = app
        .patch_json(
            &format!("/api/users/{}/role", account.id),
            Some("admin-token"),
            json!({ "role": "Moderator" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "Moderator");

    // The new role takes effect on the next guarded request
    let response = app.get("/api/applications", Some("student-token")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn role_update_rejects_unknown_label() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .account("student-token", "s@test.com", "Student", Role::Student)
        .build()
        .await;

    let account = app
        .store
        .find_account_by_email_for_test("s@test.com")
        .await;

    let response = app
        .patch_json(
            &format!("/api/users/{}/role", account.id),
            Some("admin-token"),
            json!({ "role": "SuperUser" }),
        )
        .await;

    assert_error(response, StatusCode::BAD_REQUEST, "Invalid role").await;
}

#[tokio::test]
async fn accounts_by_role_rejects_unknown_label() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .build()
        .await;

    let response = app.get("/api/users/role/wizard", Some("admin-token")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn accounts_by_role_filters() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .account("s1", "s1@test.com", "S1", Role::Student)
        .account("s2", "s2@test.com", "S2", Role::Student)
        .build()
        .await;

    let response = app.get("/api/users/role/Student", Some("admin-token")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admin_deletes_account() {
    let app = TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .account("s1", "s1@test.com", "S1", Role::Student)
        .build()
        .await;

    let account = app
        .store
        .find_account_by_email_for_test("s1@test.com")
        .await;

    let response = app
        .delete(&format!("/api/users/{}", account.id), Some("admin-token"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get("/api/users/s1@test.com", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

trait StoreTestExt {
    async fn find_account_by_email_for_test(
        &self,
        email: &str,
    ) -> scholarstream::modules::users::model::Account;
}

impl StoreTestExt for std::sync::Arc<scholarstream::store::MemStore> {
    async fn find_account_by_email_for_test(
        &self,
        email: &str,
    ) -> scholarstream::modules::users::model::Account {
        use scholarstream::store::AccountStore;
        self.find_account_by_email(email).await.unwrap().unwrap()
    }
}

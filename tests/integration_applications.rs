mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error, body_json};
use scholarstream::modules::users::model::Role;
use serde_json::{Value, json};

async fn seed_scholarship(app: &TestApp, name: &str) -> String {
    let response = app
        .post_json(
            "/api/scholarships",
            Some("admin-token"),
            json!({
                "name": name,
                "university_name": "Lund University",
                "university_country": "Sweden",
                "category": "Partial",
                "degree": "Bachelor",
                "application_fees": 60.0,
                "service_charge": 15.0,
                "application_deadline": "2027-06-01T00:00:00Z"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

fn app_builder() -> common::TestAppBuilder {
    TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .account("mod-token", "m@test.com", "Mod", Role::Moderator)
        .account("student-token", "s@test.com", "Student One", Role::Student)
        .account("other-token", "o@test.com", "Student Two", Role::Student)
}

async fn submit(app: &TestApp, token: &str, scholarship_id: &str, extra: Value) -> Value {
    let mut payload = json!({ "scholarship_id": scholarship_id });
    if let Value::Object(fields) = extra {
        for (k, v) in fields {
            payload[k] = v;
        }
    }
    let response = app.post_json("/api/applications", Some(token), payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn student_submits_application_with_snapshot() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Snapshot Grant").await;

    let body = submit(
        &app,
        "student-token",
        &scholarship_id,
        json!({ "phone": "0123456789", "degree": "Bachelor" }),
    )
    .await;

    assert_eq!(body["applicant_email"], "s@test.com");
    assert_eq!(body["applicant_name"], "Student One");
    assert_eq!(body["university_name"], "Lund University");
    assert_eq!(body["scholarship_category"], "Partial");
    assert_eq!(body["application_fees"], 60.0);
    assert_eq!(body["service_charge"], 15.0);
    assert_eq!(body["application_status"], "pending");
    assert_eq!(body["payment_status"], "unpaid");
    assert_eq!(body["phone"], "0123456789");
}

#[tokio::test]
async fn duplicate_submission_is_a_conflict() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Single Entry").await;

    submit(&app, "student-token", &scholarship_id, json!({})).await;

    let response = app
        .post_json(
            "/api/applications",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id }),
        )
        .await;

    assert_error(
        response,
        StatusCode::CONFLICT,
        "already applied for this scholarship",
    )
    .await;
}

#[tokio::test]
async fn submission_for_unknown_scholarship_is_404() {
    let app = app_builder().build().await;

    let response = app
        .post_json(
            "/api/applications",
            Some("student-token"),
            json!({ "scholarship_id": "00000000-0000-0000-0000-000000000000" }),
        )
        .await;

    assert_error(response, StatusCode::NOT_FOUND, "Scholarship not found").await;
}

#[tokio::test]
async fn my_applications_only_shows_the_callers_rows() {
    let app = app_builder().build().await;
    let first = seed_scholarship(&app, "Grant A").await;
    let second = seed_scholarship(&app, "Grant B").await;

    submit(&app, "student-token", &first, json!({})).await;
    submit(&app, "student-token", &second, json!({})).await;
    submit(&app, "other-token", &first, json!({})).await;

    let response = app
        .get("/api/applications/my-applications", Some("student-token"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|a| a["applicant_email"] == "s@test.com"));
}

#[tokio::test]
async fn moderator_lists_all_applications() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Visible Grant").await;

    submit(&app, "student-token", &scholarship_id, json!({})).await;
    submit(&app, "other-token", &scholarship_id, json!({})).await;

    let response = app.get("/api/applications", Some("mod-token")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn moderator_moves_application_through_review() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Review Grant").await;
    let application = submit(&app, "student-token", &scholarship_id, json!({})).await;
    let id = application["id"].as_str().unwrap();

    let response = app
        .patch_json(
            &format!("/api/applications/{id}/status"),
            Some("mod-token"),
            json!({ "application_status": "processing", "feedback": "Looks promising" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["application_status"], "processing");
    assert_eq!(body["feedback"], "Looks promising");
    assert!(body["feedback_at"].is_string());
}

#[tokio::test]
async fn status_update_rejects_unknown_label() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Strict Grant").await;
    let application = submit(&app, "student-token", &scholarship_id, json!({})).await;
    let id = application["id"].as_str().unwrap();

    let response = app
        .patch_json(
            &format!("/api/applications/{id}/status"),
            Some("mod-token"),
            json!({ "application_status": "approved" }),
        )
        .await;

    assert_error(response, StatusCode::BAD_REQUEST, "Invalid application status").await;
}

#[tokio::test]
async fn admin_corrects_payment_state() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Paid Grant").await;
    let application = submit(&app, "student-token", &scholarship_id, json!({})).await;
    let id = application["id"].as_str().unwrap();

    // Moderators cannot touch payment state
    let response = app
        .patch_json(
            &format!("/api/applications/{id}/payment"),
            Some("mod-token"),
            json!({ "payment_status": "paid" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .patch_json(
            &format!("/api/applications/{id}/payment"),
            Some("admin-token"),
            json!({ "payment_status": "paid" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["payment_status"], "paid");

    let response = app
        .patch_json(
            &format!("/api/applications/{id}/payment"),
            Some("admin-token"),
            json!({ "payment_status": "refunded" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn students_delete_only_their_own_pending_applications() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Deletable Grant").await;
    let application = submit(&app, "student-token", &scholarship_id, json!({})).await;
    let id = application["id"].as_str().unwrap();

    // Another student cannot delete it
    let response = app
        .delete(&format!("/api/applications/{id}"), Some("other-token"))
        .await;
    assert_error(
        response,
        StatusCode::FORBIDDEN,
        "only delete your own applications",
    )
    .await;

    let response = app
        .delete(&format!("/api/applications/{id}"), Some("student-token"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get(&format!("/api/applications/{id}"), Some("mod-token"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reviewed_application_cannot_be_deleted() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app, "Locked Grant").await;
    let application = submit(&app, "student-token", &scholarship_id, json!({})).await;
    let id = application["id"].as_str().unwrap();

    let response = app
        .patch_json(
            &format!("/api/applications/{id}/status"),
            Some("mod-token"),
            json!({ "application_status": "processing" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .delete(&format!("/api/applications/{id}"), Some("student-token"))
        .await;
    assert_error(response, StatusCode::CONFLICT, "already being processed").await;
}

mod common;

use axum::http::StatusCode;
use common::{TestApp, assert_error, body_json};
use scholarstream::modules::users::model::Role;
use serde_json::{Value, json};

fn app_builder() -> common::TestAppBuilder {
    TestApp::builder()
        .account("admin-token", "a@test.com", "Admin", Role::Admin)
        .account("mod-token", "m@test.com", "Mod", Role::Moderator)
        .account("student-token", "s@test.com", "Student One", Role::Student)
        .account("other-token", "o@test.com", "Student Two", Role::Student)
}

async fn seed_scholarship(app: &TestApp) -> String {
    let response = app
        .post_json(
            "/api/scholarships",
            Some("admin-token"),
            json!({
                "name": "Reviewed Grant",
                "university_name": "KU Leuven",
                "university_country": "Belgium",
                "category": "Partial",
                "degree": "Masters",
                "application_fees": 45.0,
                "service_charge": 5.0,
                "application_deadline": "2027-09-01T00:00:00Z"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

async fn post_review(app: &TestApp, token: &str, scholarship_id: &str, rating: i32) -> Value {
    let response = app
        .post_json(
            "/api/reviews",
            Some(token),
            json!({
                "scholarship_id": scholarship_id,
                "rating": rating,
                "comment": "Smooth application process."
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn student_posts_a_review_with_denormalized_names() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app).await;

    let body = post_review(&app, "student-token", &scholarship_id, 4).await;

    assert_eq!(body["scholarship_name"], "Reviewed Grant");
    assert_eq!(body["university_name"], "KU Leuven");
    assert_eq!(body["author_email"], "s@test.com");
    assert_eq!(body["author_name"], "Student One");
    assert_eq!(body["rating"], 4);
}

#[tokio::test]
async fn rating_outside_range_is_rejected() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app).await;

    let response = app
        .post_json(
            "/api/reviews",
            Some("student-token"),
            json!({ "scholarship_id": scholarship_id, "rating": 6, "comment": "Too good." }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_for_unknown_scholarship_is_404() {
    let app = app_builder().build().await;

    let response = app
        .post_json(
            "/api/reviews",
            Some("student-token"),
            json!({
                "scholarship_id": "00000000-0000-0000-0000-000000000000",
                "rating": 3,
                "comment": "Hm."
            }),
        )
        .await;

    assert_error(response, StatusCode::NOT_FOUND, "Scholarship not found").await;
}

#[tokio::test]
async fn public_listings_filter_by_scholarship_and_author() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app).await;

    post_review(&app, "student-token", &scholarship_id, 5).await;
    post_review(&app, "other-token", &scholarship_id, 2).await;

    let response = app.get("/api/reviews", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app
        .get(&format!("/api/reviews/scholarship/{scholarship_id}"), None)
        .await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app.get("/api/reviews?email=o@test.com", None).await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["author_email"], "o@test.com");

    let response = app.get("/api/reviews/my-reviews", Some("student-token")).await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["author_email"], "s@test.com");
}

#[tokio::test]
async fn only_the_author_edits_a_review() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app).await;
    let review = post_review(&app, "student-token", &scholarship_id, 3).await;
    let id = review["id"].as_str().unwrap();

    let response = app
        .patch_json(
            &format!("/api/reviews/{id}"),
            Some("other-token"),
            json!({ "rating": 1 }),
        )
        .await;
    assert_error(response, StatusCode::FORBIDDEN, "only edit your own reviews").await;

    let response = app
        .patch_json(
            &format!("/api/reviews/{id}"),
            Some("student-token"),
            json!({ "rating": 5, "comment": "Better than I thought." }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["rating"], 5);
    assert_eq!(body["comment"], "Better than I thought.");
}

#[tokio::test]
async fn moderators_can_delete_any_review() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app).await;
    let review = post_review(&app, "student-token", &scholarship_id, 1).await;
    let id = review["id"].as_str().unwrap();

    // Another student cannot
    let response = app
        .delete(&format!("/api/reviews/{id}"), Some("other-token"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .delete(&format!("/api/reviews/{id}"), Some("mod-token"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get("/api/reviews", None).await;
    let body = body_json(response).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn authors_delete_their_own_reviews() {
    let app = app_builder().build().await;
    let scholarship_id = seed_scholarship(&app).await;
    let review = post_review(&app, "student-token", &scholarship_id, 2).await;
    let id = review["id"].as_str().unwrap();

    let response = app
        .delete(&format!("/api/reviews/{id}"), Some("student-token"))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

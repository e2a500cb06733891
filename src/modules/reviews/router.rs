use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    create_review, delete_review, get_my_reviews, get_reviews, get_scholarship_reviews,
    update_review,
};

pub fn init_reviews_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_reviews).post(create_review))
        .route("/my-reviews", get(get_my_reviews))
        .route("/scholarship/{id}", get(get_scholarship_reviews))
        .route("/{id}", patch(update_review).delete(delete_review))
}

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    approve_role_request, create_role_request, get_all_role_requests, get_my_role_requests,
    get_pending_role_requests, reject_role_request,
};

pub fn init_role_requests_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_role_request))
        .route("/my-requests", get(get_my_role_requests))
        .route("/pending", get(get_pending_role_requests))
        .route("/all", get(get_all_role_requests))
        .route("/approve/{id}", put(approve_role_request))
        .route("/reject/{id}", put(reject_role_request))
}

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    create_application, delete_application, get_application, get_applications,
    get_my_applications, update_application_payment, update_application_status,
};

pub fn init_applications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_applications).post(create_application))
        .route("/my-applications", get(get_my_applications))
        .route("/{id}", get(get_application).delete(delete_application))
        .route("/{id}/status", patch(update_application_status))
        .route("/{id}/payment", patch(update_application_payment))
}

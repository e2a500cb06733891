use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{confirm_payment, create_checkout, save_unpaid};

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/create-checkout", post(create_checkout))
        .route("/confirm-payment", post(confirm_payment))
        .route("/save-unpaid", post(save_unpaid))
}

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    delete_account, get_account, get_accounts, get_accounts_by_role, get_role, sync_account,
    update_role,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/create-or-update", post(sync_account))
        .route("/", get(get_accounts))
        .route("/role/{role}", get(get_accounts_by_role))
        .route("/{email}/role", get(get_role).patch(update_role))
        .route("/{email}", get(get_account).delete(delete_account))
}

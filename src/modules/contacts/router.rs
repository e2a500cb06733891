use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_contact, delete_contact, get_contact, get_contact_stats, get_contacts, update_contact,
};

pub fn init_contacts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_contacts).post(create_contact))
        .route("/stats", get(get_contact_stats))
        .route(
            "/{id}",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
}

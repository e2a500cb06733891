use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_scholarship, delete_scholarship, get_scholarship, get_scholarships,
    get_top_scholarships, update_scholarship,
};

pub fn init_scholarships_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_scholarships).post(create_scholarship))
        .route("/top", get(get_top_scholarships))
        .route(
            "/{id}",
            get(get_scholarship)
                .patch(update_scholarship)
                .delete(delete_scholarship),
        )
}

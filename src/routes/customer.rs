//! Root, profile and customer routes.

use crate::handlers::{customer, root, search};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn customer_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::index))
        .route("/profile", get(root::profiles))
        .route("/profile/customers", get(root::customer_profile))
        .route("/customers", get(customer::list).post(customer::create))
        .route("/customers/search", get(search::index))
        .route("/customers/search/:method", get(search::find))
        .route(
            "/customers/:id",
            get(customer::read)
                .put(customer::replace)
                .patch(customer::merge)
                .delete(customer::delete),
        )
        .with_state(state)
}

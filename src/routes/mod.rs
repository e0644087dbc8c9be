//! Route tables and the assembled application router.

pub mod common;
pub mod customer;
pub mod openapi;

pub use common::common_routes;
pub use customer::customer_routes;
pub use openapi::{openapi_routes, ApiDoc};

use crate::security::authorize;
use crate::state::AppState;
use axum::{middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Every route behind the security middleware, with tracing, permissive CORS and a body size limit.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .merge(customer_routes(state.clone()))
        .merge(common_routes(state.clone()))
        .merge(openapi_routes())
        .layer(middleware::from_fn_with_state(state, authorize))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

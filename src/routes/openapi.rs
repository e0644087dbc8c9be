//! OpenAPI document served at `/openapi.json`.

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(title = "Customers API", description = "Customer records with HAL links; writes require the ADMIN role."),
    paths(
        crate::handlers::root::index,
        crate::handlers::root::profiles,
        crate::handlers::root::customer_profile,
        crate::handlers::customer::list,
        crate::handlers::customer::read,
        crate::handlers::customer::create,
        crate::handlers::customer::replace,
        crate::handlers::customer::merge,
        crate::handlers::customer::delete,
        crate::handlers::search::index,
        crate::handlers::search::find,
        crate::routes::common::health,
        crate::routes::common::ready,
        crate::routes::common::version,
    ),
    components(schemas(
        crate::model::Customer,
        crate::model::CustomerDraft,
        crate::model::PageMetadata,
        crate::response::Link,
        crate::response::LinksModel,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::common::HealthBody,
        crate::routes::common::ReadyBody,
    )),
    modifiers(&BasicAuth),
    tags(
        (name = "discovery", description = "API root and resource profiles"),
        (name = "customers", description = "Customer CRUD and search"),
        (name = "operations", description = "Health, readiness and version"),
    )
)]
pub struct ApiDoc;

/// Registers the `basic_auth` scheme referenced by the write operations.
struct BasicAuth;

impl Modify for BasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("basic_auth", SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)));
    }
}

pub fn openapi_routes() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

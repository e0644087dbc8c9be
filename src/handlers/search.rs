//! Exact-match lookups under `/customers/search`.

use crate::error::AppError;
use crate::extractors::BaseUrl;
use crate::model::CustomerField;
use crate::response::{search_links, CustomerCollection, Hal, LinksModel};
use crate::service::CustomerService;
use crate::state::AppState;
use axum::extract::{rejection::QueryRejection, Path, Query, State};
use std::collections::HashMap;

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query.map(|Query(q)| q).map_err(|e| AppError::BadRequest(e.body_text()))
}

#[utoipa::path(
    get,
    path = "/customers/search",
    tag = "customers",
    responses((status = 200, description = "One templated link per search method", body = LinksModel))
)]
pub async fn index(base: BaseUrl) -> Hal<LinksModel> {
    Hal(search_links(&base))
}

/// `findByX?x=value`. Without the parameter the search matches customers whose field is null.
#[utoipa::path(
    get,
    path = "/customers/search/{method}",
    tag = "customers",
    params(
        ("method" = String, Path, description = "findByFirstName, findByLastName, findByEmail, findByGender or findByJobTitle"),
    ),
    responses(
        (status = 200, description = "Matching customers"),
        (status = 400, description = "Malformed query string", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown search method", body = crate::error::ErrorBody),
    )
)]
pub async fn find(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(method): Path<String>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Hal<CustomerCollection>, AppError> {
    let params = query_params(query)?;
    let field = CustomerField::from_search_method(&method)
        .ok_or_else(|| AppError::NotFound(format!("search method {}", method)))?;
    let value = params.get(field.property()).map(String::as_str);
    let customers = CustomerService::find_by(state.store.as_ref(), field, value).await?;
    tracing::debug!(method = %method, matches = customers.len(), "customer search");
    Ok(Hal(CustomerCollection::search_result(&base, field, customers)))
}

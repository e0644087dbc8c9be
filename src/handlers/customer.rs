//! Customer collection and item handlers.

use crate::error::AppError;
use crate::extractors::{BaseUrl, CurrentPrincipal, Paging};
use crate::model::{Customer, CustomerDraft, CustomerPatch};
use crate::response::{created, CustomerCollection, CustomerModel, Hal};
use crate::service::CustomerService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

/// A malformed id names no customer.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(format!("customer {}", id)))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|e| AppError::BadRequest(e.body_text()))
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page number"),
        ("size" = Option<u32>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "property[,asc|desc], repeatable"),
    ),
    responses(
        (status = 200, description = "Customers with paging metadata when paged"),
        (status = 400, description = "Malformed paging or unknown sort property", body = crate::error::ErrorBody),
    )
)]
pub async fn list(State(state): State<AppState>, base: BaseUrl, paging: Paging) -> Result<Hal<CustomerCollection>, AppError> {
    let store = state.store.as_ref();
    let body = match paging.page {
        Some(request) => {
            let page = CustomerService::find_page(store, &paging.sort, request).await?;
            CustomerCollection::paged(&base, page, &paging.sort)
        }
        None => CustomerCollection::unpaged(&base, CustomerService::find_all(store, &paging.sort).await?),
    };
    Ok(Hal(body))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "The customer", body = Customer),
        (status = 404, description = "No such customer", body = crate::error::ErrorBody),
    )
)]
pub async fn read(State(state): State<AppState>, base: BaseUrl, Path(id): Path<String>) -> Result<Hal<CustomerModel>, AppError> {
    let customer = CustomerService::get(state.store.as_ref(), parse_id(&id)?).await?;
    Ok(Hal(CustomerModel::new(&base, customer)))
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    request_body = CustomerDraft,
    security(("basic_auth" = [])),
    responses(
        (status = 201, description = "Created; Location names the new customer", body = Customer),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 403, description = "ADMIN role required", body = crate::error::ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    base: BaseUrl,
    principal: CurrentPrincipal,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let draft = CustomerDraft::from_json(json_body(body)?)?;
    let customer = CustomerService::save(state.store.as_ref(), draft).await?;
    tracing::info!(actor = principal.name(), customer_id = %customer.id, "POST /customers");
    Ok(created(&base, customer))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    request_body = CustomerDraft,
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Replaced; absent fields are cleared", body = Customer),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 404, description = "No such customer", body = crate::error::ErrorBody),
    )
)]
pub async fn replace(
    State(state): State<AppState>,
    base: BaseUrl,
    principal: CurrentPrincipal,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Hal<CustomerModel>, AppError> {
    let id = parse_id(&id)?;
    let draft = CustomerDraft::from_json(json_body(body)?)?;
    let customer = CustomerService::replace(state.store.as_ref(), id, draft).await?;
    tracing::info!(actor = principal.name(), customer_id = %id, "PUT /customers/:id");
    Ok(Hal(CustomerModel::new(&base, customer)))
}

#[utoipa::path(
    patch,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    request_body = CustomerDraft,
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Merged; absent fields are kept", body = Customer),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 404, description = "No such customer", body = crate::error::ErrorBody),
    )
)]
pub async fn merge(
    State(state): State<AppState>,
    base: BaseUrl,
    principal: CurrentPrincipal,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Hal<CustomerModel>, AppError> {
    let id = parse_id(&id)?;
    let patch = CustomerPatch::from_json(json_body(body)?)?;
    let customer: Customer = CustomerService::merge(state.store.as_ref(), id, patch).await?;
    tracing::info!(actor = principal.name(), customer_id = %id, "PATCH /customers/:id");
    Ok(Hal(CustomerModel::new(&base, customer)))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer id")),
    security(("basic_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
        (status = 404, description = "No such customer", body = crate::error::ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    CustomerService::remove(state.store.as_ref(), id).await?;
    tracing::info!(actor = principal.name(), customer_id = %id, "DELETE /customers/:id");
    Ok(StatusCode::NO_CONTENT)
}

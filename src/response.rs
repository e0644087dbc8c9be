//! HAL representations (`_links`, `_embedded`) returned by the customer handlers.

use crate::extractors::BaseUrl;
use crate::model::{Customer, CustomerField, Page, PageMetadata, Sort};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub const HAL_JSON: &str = "application/hal+json";

pub const CUSTOMERS_PATH: &str = "/customers";
pub const SEARCH_PATH: &str = "/customers/search";
pub const PROFILE_PATH: &str = "/profile";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            templated: false,
        }
    }

    pub fn templated(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            templated: true,
        }
    }
}

pub type Links = BTreeMap<String, Link>;

/// Body of `GET /` and `GET /customers/search`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LinksModel {
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct CustomerModel {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl CustomerModel {
    pub fn new(base: &BaseUrl, customer: Customer) -> Self {
        let href = base.join(&customer_path(&customer));
        let mut links = Links::new();
        links.insert("self".into(), Link::new(href.clone()));
        links.insert("customer".into(), Link::new(href));
        CustomerModel { customer, links }
    }
}

#[derive(Debug, Serialize)]
pub struct EmbeddedCustomers {
    pub customers: Vec<CustomerModel>,
}

#[derive(Debug, Serialize)]
pub struct CustomerCollection {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedCustomers,
    #[serde(rename = "_links")]
    pub links: Links,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageMetadata>,
}

impl CustomerCollection {
    fn embed(base: &BaseUrl, customers: Vec<Customer>) -> EmbeddedCustomers {
        EmbeddedCustomers {
            customers: customers.into_iter().map(|c| CustomerModel::new(base, c)).collect(),
        }
    }

    fn collection_links(base: &BaseUrl) -> Links {
        let mut links = Links::new();
        links.insert(
            "self".into(),
            Link::templated(format!("{}{{?page,size,sort}}", base.join(CUSTOMERS_PATH))),
        );
        links.insert("profile".into(), Link::new(base.join(&format!("{}/customers", PROFILE_PATH))));
        links.insert("search".into(), Link::new(base.join(SEARCH_PATH)));
        links
    }

    /// Every customer, no paging metadata.
    pub fn unpaged(base: &BaseUrl, customers: Vec<Customer>) -> Self {
        CustomerCollection {
            embedded: Self::embed(base, customers),
            links: Self::collection_links(base),
            page: None,
        }
    }

    /// One page with `first`/`prev`/`next`/`last` navigation that keeps the sort.
    pub fn paged(base: &BaseUrl, page: Page<Customer>, sort: &Sort) -> Self {
        let mut links = Self::collection_links(base);
        let metadata = page.metadata();
        let size = page.size;
        let last = page.total_pages().saturating_sub(1);
        let nav = |number: u64| Link::new(page_href(base, number, size, sort));
        if page.total_elements > 0 {
            links.insert("first".into(), nav(0));
            links.insert("last".into(), nav(last));
        }
        if page.has_previous() {
            links.insert("prev".into(), nav(u64::from(page.number) - 1));
        }
        if page.has_next() {
            links.insert("next".into(), nav(u64::from(page.number) + 1));
        }
        CustomerCollection {
            embedded: Self::embed(base, page.content),
            links,
            page: Some(metadata),
        }
    }

    /// Result of a search method; `self` is the method's templated link.
    pub fn search_result(base: &BaseUrl, field: CustomerField, customers: Vec<Customer>) -> Self {
        let mut links = Links::new();
        if let Some(link) = search_link(base, field) {
            links.insert("self".into(), link);
        }
        CustomerCollection {
            embedded: Self::embed(base, customers),
            links,
            page: None,
        }
    }
}

pub fn customer_path(customer: &Customer) -> String {
    format!("{}/{}", CUSTOMERS_PATH, customer.id)
}

fn page_href(base: &BaseUrl, number: u64, size: u32, sort: &Sort) -> String {
    let mut query = vec![format!("page={}", number), format!("size={}", size)];
    query.extend(sort.to_query());
    format!("{}?{}", base.join(CUSTOMERS_PATH), query.join("&"))
}

fn search_link(base: &BaseUrl, field: CustomerField) -> Option<Link> {
    let method = field.search_method()?;
    Some(Link::templated(format!(
        "{}/{}{{?{}}}",
        base.join(SEARCH_PATH),
        method,
        field.property()
    )))
}

/// `_links.customers` and `_links.profile` for the API root.
pub fn root_links(base: &BaseUrl) -> LinksModel {
    let mut links = Links::new();
    links.insert(
        "customers".into(),
        Link::templated(format!("{}{{?page,size,sort}}", base.join(CUSTOMERS_PATH))),
    );
    links.insert("profile".into(), Link::new(base.join(PROFILE_PATH)));
    LinksModel { links }
}

/// One templated link per search method plus `self`.
pub fn search_links(base: &BaseUrl) -> LinksModel {
    let mut links = Links::new();
    for field in CustomerField::SEARCHABLE {
        if let (Some(method), Some(link)) = (field.search_method(), search_link(base, field)) {
            links.insert(method.to_string(), link);
        }
    }
    links.insert("self".into(), Link::new(base.join(SEARCH_PATH)));
    LinksModel { links }
}

/// JSON body sent as `application/hal+json`.
pub struct Hal<T>(pub T);

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.0).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
        response
    }
}

/// 201 with an absolute `Location` and the new resource as body.
pub fn created(base: &BaseUrl, customer: Customer) -> Response {
    let location = base.join(&customer_path(&customer));
    let mut response = (StatusCode::CREATED, Hal(CustomerModel::new(base, customer))).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

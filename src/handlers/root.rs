//! API root and resource profile.

use crate::extractors::BaseUrl;
use crate::model::CustomerField;
use crate::response::{root_links, Hal, Link, Links, LinksModel, CUSTOMERS_PATH, PROFILE_PATH};
use axum::{http::header, response::IntoResponse};
use serde_json::{json, Value};

pub const ALPS_JSON: &str = "application/alps+json";

#[utoipa::path(
    get,
    path = "/",
    tag = "discovery",
    responses((status = 200, description = "Links to the customer collection and profile", body = LinksModel))
)]
pub async fn index(base: BaseUrl) -> Hal<LinksModel> {
    Hal(root_links(&base))
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "discovery",
    responses((status = 200, description = "Links to each resource profile", body = LinksModel))
)]
pub async fn profiles(base: BaseUrl) -> Hal<LinksModel> {
    let mut links = Links::new();
    links.insert("self".into(), Link::new(base.join(PROFILE_PATH)));
    links.insert("customers".into(), Link::new(base.join(&format!("{}{}", PROFILE_PATH, CUSTOMERS_PATH))));
    Hal(LinksModel { links })
}

/// ALPS description of the customer representation.
pub fn customer_alps() -> Value {
    let properties: Vec<Value> = CustomerField::ALL
        .iter()
        .filter(|f| **f != CustomerField::Id)
        .map(|f| json!({ "name": f.property(), "type": "SEMANTIC" }))
        .collect();
    json!({
        "alps": {
            "version": "1.0",
            "descriptor": [
                { "id": "customer-representation", "descriptor": properties },
                { "id": "get-customers", "name": "customers", "type": "SAFE", "rt": "#customer-representation" },
                { "id": "create-customers", "name": "customers", "type": "UNSAFE", "rt": "#customer-representation" },
                { "id": "get-customer", "name": "customer", "type": "SAFE", "rt": "#customer-representation" },
                { "id": "update-customer", "name": "customer", "type": "IDEMPOTENT", "rt": "#customer-representation" },
                { "id": "patch-customer", "name": "customer", "type": "UNSAFE", "rt": "#customer-representation" },
                { "id": "delete-customer", "name": "customer", "type": "IDEMPOTENT", "rt": "#customer-representation" },
            ]
        }
    })
}

#[utoipa::path(
    get,
    path = "/profile/customers",
    tag = "discovery",
    responses((status = 200, description = "ALPS document for customers"))
)]
pub async fn customer_profile() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, ALPS_JSON)], axum::Json(customer_alps()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alps_lists_every_writable_property() {
        let doc = customer_alps();
        let names: Vec<&str> = doc["alps"]["descriptor"][0]["descriptor"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["name"].as_str())
            .collect();
        assert_eq!(names, vec!["firstName", "lastName", "email", "gender", "jobTitle"]);
    }
}

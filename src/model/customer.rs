//! The customer record and its write-side shapes (draft for POST/PUT, patch for PATCH).

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored customer. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub job_title: Option<String>,
}

/// Field values supplied on create or full replace. Absent fields are `None`.
/// Unknown properties, including a client-supplied `id`, are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
}

impl CustomerDraft {
    pub fn new(first_name: &str, last_name: &str, email: &str, gender: &str, job_title: &str) -> Self {
        CustomerDraft {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            email: Some(email.to_string()),
            gender: Some(gender.to_string()),
            job_title: Some(job_title.to_string()),
        }
    }

    /// Parse a request body. The body must be a JSON object whose known fields are strings or null.
    pub fn from_json(value: Value) -> Result<Self, AppError> {
        if !value.is_object() {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("invalid customer: {}", e)))
    }
}

/// Partial update. Outer `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub gender: Option<Option<String>>,
    pub job_title: Option<Option<String>>,
}

impl CustomerPatch {
    pub fn from_json(value: Value) -> Result<Self, AppError> {
        let Value::Object(map) = value else {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        };
        Ok(CustomerPatch {
            first_name: patch_field(&map, CustomerField::FirstName)?,
            last_name: patch_field(&map, CustomerField::LastName)?,
            email: patch_field(&map, CustomerField::Email)?,
            gender: patch_field(&map, CustomerField::Gender)?,
            job_title: patch_field(&map, CustomerField::JobTitle)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.gender.is_none()
            && self.job_title.is_none()
    }
}

fn patch_field(map: &Map<String, Value>, field: CustomerField) -> Result<Option<Option<String>>, AppError> {
    match map.get(field.property()) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(_) => Err(AppError::BadRequest(format!(
            "invalid customer: {} must be a string or null",
            field.property()
        ))),
    }
}

impl Customer {
    pub fn from_draft(id: Uuid, draft: CustomerDraft) -> Self {
        Customer {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            gender: draft.gender,
            job_title: draft.job_title,
        }
    }

    /// Full replace: every field takes the draft's value, absent ones become null.
    pub fn replace(&mut self, draft: CustomerDraft) {
        let id = self.id;
        *self = Customer::from_draft(id, draft);
    }

    /// Merge: only fields present in the patch change.
    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.gender {
            self.gender = v;
        }
        if let Some(v) = patch.job_title {
            self.job_title = v;
        }
    }

    /// Value of a text field; `None` for `id` and for unset fields.
    pub fn text(&self, field: CustomerField) -> Option<&str> {
        match field {
            CustomerField::Id => None,
            CustomerField::FirstName => self.first_name.as_deref(),
            CustomerField::LastName => self.last_name.as_deref(),
            CustomerField::Email => self.email.as_deref(),
            CustomerField::Gender => self.gender.as_deref(),
            CustomerField::JobTitle => self.job_title.as_deref(),
        }
    }
}

/// Customer properties addressable by sort and lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Id,
    FirstName,
    LastName,
    Email,
    Gender,
    JobTitle,
}

impl CustomerField {
    pub const ALL: [CustomerField; 6] = [
        CustomerField::Id,
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::Email,
        CustomerField::Gender,
        CustomerField::JobTitle,
    ];

    /// Fields with an exact-match search method.
    pub const SEARCHABLE: [CustomerField; 5] = [
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::Email,
        CustomerField::Gender,
        CustomerField::JobTitle,
    ];

    /// JSON property name.
    pub fn property(&self) -> &'static str {
        match self {
            CustomerField::Id => "id",
            CustomerField::FirstName => "firstName",
            CustomerField::LastName => "lastName",
            CustomerField::Email => "email",
            CustomerField::Gender => "gender",
            CustomerField::JobTitle => "jobTitle",
        }
    }

    /// Column in the `customers` table.
    pub fn column(&self) -> &'static str {
        match self {
            CustomerField::Id => "id",
            CustomerField::FirstName => "first_name",
            CustomerField::LastName => "last_name",
            CustomerField::Email => "email",
            CustomerField::Gender => "gender",
            CustomerField::JobTitle => "job_title",
        }
    }

    pub fn from_property(name: &str) -> Option<CustomerField> {
        Self::ALL.iter().copied().find(|f| f.property() == name)
    }

    /// Name of the search method under `/customers/search/`, e.g. `findByEmail`.
    pub fn search_method(&self) -> Option<&'static str> {
        match self {
            CustomerField::Id => None,
            CustomerField::FirstName => Some("findByFirstName"),
            CustomerField::LastName => Some("findByLastName"),
            CustomerField::Email => Some("findByEmail"),
            CustomerField::Gender => Some("findByGender"),
            CustomerField::JobTitle => Some("findByJobTitle"),
        }
    }

    pub fn from_search_method(method: &str) -> Option<CustomerField> {
        Self::SEARCHABLE
            .iter()
            .copied()
            .find(|f| f.search_method() == Some(method))
    }
}

//! Storage seam for customers. Handlers and the service only see `CustomerStore`.

use crate::error::StoreError;
use crate::model::{Customer, CustomerDraft, CustomerField, Page, PageRequest, Sort};
use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCustomerStore;
pub use postgres::{ensure_database_exists, PgCustomerStore};

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Store a new customer under a freshly generated id.
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError>;

    /// Store several customers; either all are stored or none.
    async fn create_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, StoreError>;

    /// All customers in `sort` order (ties broken by id). With a page, only that slice.
    async fn list(&self, sort: &Sort, page: Option<PageRequest>) -> Result<Page<Customer>, StoreError>;

    /// Exact, case-sensitive match on one text field. `None` matches unset fields.
    async fn find_by_field(&self, field: CustomerField, value: Option<&str>) -> Result<Vec<Customer>, StoreError>;

    /// Overwrite the text fields of an existing customer. `None` when the id is unknown.
    async fn update(&self, customer: &Customer) -> Result<Option<Customer>, StoreError>;

    /// `true` when a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Remove the listed ids that exist; returns how many were removed.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError>;

    async fn delete_all(&self) -> Result<u64, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Cheap liveness check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

//! Customer persistence semantics over any `CustomerStore`: save, replace, merge, remove, query.

use crate::error::AppError;
use crate::model::{Customer, CustomerDraft, CustomerField, CustomerPatch, Page, PageRequest, Sort};
use crate::store::CustomerStore;
use uuid::Uuid;

pub struct CustomerService;

impl CustomerService {
    pub async fn save(store: &dyn CustomerStore, draft: CustomerDraft) -> Result<Customer, AppError> {
        let customer = store.create(draft).await?;
        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Bulk save in one unit; returns customers in input order.
    pub async fn save_all(store: &dyn CustomerStore, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, AppError> {
        let created = store.create_all(drafts).await?;
        tracing::info!(count = created.len(), "customers created");
        Ok(created)
    }

    pub async fn get(store: &dyn CustomerStore, id: Uuid) -> Result<Customer, AppError> {
        store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {}", id)))
    }

    pub async fn find_all(store: &dyn CustomerStore, sort: &Sort) -> Result<Vec<Customer>, AppError> {
        Ok(store.list(sort, None).await?.content)
    }

    pub async fn find_page(store: &dyn CustomerStore, sort: &Sort, page: PageRequest) -> Result<Page<Customer>, AppError> {
        Ok(store.list(sort, Some(page)).await?)
    }

    pub async fn find_by(
        store: &dyn CustomerStore,
        field: CustomerField,
        value: Option<&str>,
    ) -> Result<Vec<Customer>, AppError> {
        if field == CustomerField::Id {
            return Err(AppError::BadRequest("customers cannot be searched by id".into()));
        }
        Ok(store.find_by_field(field, value).await?)
    }

    /// PUT semantics: every field takes the draft's value.
    pub async fn replace(store: &dyn CustomerStore, id: Uuid, draft: CustomerDraft) -> Result<Customer, AppError> {
        let mut customer = Self::get(store, id).await?;
        customer.replace(draft);
        Self::write_back(store, customer).await
    }

    /// PATCH semantics: only fields present in the patch change.
    pub async fn merge(store: &dyn CustomerStore, id: Uuid, patch: CustomerPatch) -> Result<Customer, AppError> {
        let mut customer = Self::get(store, id).await?;
        if patch.is_empty() {
            return Ok(customer);
        }
        customer.apply(patch);
        Self::write_back(store, customer).await
    }

    pub async fn remove(store: &dyn CustomerStore, id: Uuid) -> Result<(), AppError> {
        if !store.delete(id).await? {
            return Err(AppError::NotFound(format!("customer {}", id)));
        }
        tracing::info!(customer_id = %id, "customer deleted");
        Ok(())
    }

    /// Removes whichever of `ids` exist; unknown ids are skipped.
    pub async fn remove_many(store: &dyn CustomerStore, ids: &[Uuid]) -> Result<u64, AppError> {
        let removed = store.delete_many(ids).await?;
        tracing::info!(requested = ids.len(), removed, "customers deleted");
        Ok(removed)
    }

    pub async fn remove_all(store: &dyn CustomerStore) -> Result<u64, AppError> {
        let removed = store.delete_all().await?;
        tracing::warn!(removed, "all customers deleted");
        Ok(removed)
    }

    async fn write_back(store: &dyn CustomerStore, customer: Customer) -> Result<Customer, AppError> {
        let id = customer.id;
        // The row can disappear between read and write when a delete races the update.
        let updated = store
            .update(&customer)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {}", id)))?;
        tracing::info!(customer_id = %id, "customer updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCustomerStore;
    use serde_json::json;

    fn nino() -> CustomerDraft {
        CustomerDraft::new("Nino", "Tan Cardoso", "nino@the9o.com", "Male", "Developer")
    }

    #[tokio::test]
    async fn replace_then_merge() {
        let store = InMemoryCustomerStore::new();
        let created = CustomerService::save(&store, nino()).await.unwrap();

        let replaced = CustomerService::replace(
            &store,
            created.id,
            CustomerDraft {
                first_name: Some("Nino2".into()),
                last_name: Some("Tan Cardoso2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.email, None);

        let patch = CustomerPatch::from_json(json!({ "email": "nino@the9o.com" })).unwrap();
        let merged = CustomerService::merge(&store, created.id, patch).await.unwrap();
        assert_eq!(merged.first_name.as_deref(), Some("Nino2"));
        assert_eq!(merged.email.as_deref(), Some("nino@the9o.com"));

        let stored = CustomerService::get(&store, created.id).await.unwrap();
        assert_eq!(stored, merged);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = InMemoryCustomerStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(CustomerService::get(&store, id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            CustomerService::replace(&store, id, nino()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            CustomerService::merge(&store, id, CustomerPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(CustomerService::remove(&store, id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_emails_are_allowed() {
        let store = InMemoryCustomerStore::new();
        let created = CustomerService::save_all(&store, vec![nino(), nino()]).await.unwrap();
        assert_ne!(created[0].id, created[1].id);
        let hits = CustomerService::find_by(&store, CustomerField::Email, Some("nino@the9o.com"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn search_by_id_rejected() {
        let store = InMemoryCustomerStore::new();
        let err = CustomerService::find_by(&store, CustomerField::Id, Some("x")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn bulk_removal() {
        let store = InMemoryCustomerStore::new();
        let created = CustomerService::save_all(&store, vec![nino(), nino(), nino()]).await.unwrap();
        let removed = CustomerService::remove_many(&store, &[created[0].id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(CustomerService::remove_all(&store).await.unwrap(), 2);
        assert!(CustomerService::find_all(&store, &Sort::unsorted()).await.unwrap().is_empty());
    }
}

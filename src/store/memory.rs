//! Process-local customer store. Used when no database is configured, and by tests.

use crate::error::StoreError;
use crate::model::{compare_nullable, Customer, CustomerDraft, CustomerField, Direction, Page, PageRequest, Sort};
use crate::store::CustomerStore;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryCustomerStore {
    rows: RwLock<HashMap<Uuid, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Customer>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable("customer map lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Customer>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable("customer map lock poisoned".into()))
    }
}

fn fresh_id(rows: &HashMap<Uuid, Customer>) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if !rows.contains_key(&id) {
            return id;
        }
    }
}

fn compare(a: &Customer, b: &Customer, sort: &Sort) -> Ordering {
    for order in &sort.0 {
        let ord = match order.field {
            CustomerField::Id => compare_nullable(Some(a.id), Some(b.id), order.direction),
            field => compare_nullable(a.text(field), b.text(field), order.direction),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    compare_nullable(Some(a.id), Some(b.id), Direction::Asc)
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let mut rows = self.write()?;
        let customer = Customer::from_draft(fresh_id(&rows), draft);
        rows.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn create_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, StoreError> {
        let mut rows = self.write()?;
        let mut out = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let customer = Customer::from_draft(fresh_id(&rows), draft);
            rows.insert(customer.id, customer.clone());
            out.push(customer);
        }
        Ok(out)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn list(&self, sort: &Sort, page: Option<PageRequest>) -> Result<Page<Customer>, StoreError> {
        let mut all: Vec<Customer> = self.read()?.values().cloned().collect();
        all.sort_by(|a, b| compare(a, b, sort));
        let total = all.len() as u64;
        Ok(match page {
            Some(p) => Page {
                content: all
                    .into_iter()
                    .skip(p.offset() as usize)
                    .take(p.size as usize)
                    .collect(),
                number: p.number,
                size: p.size,
                total_elements: total,
            },
            None => Page {
                size: all.len() as u32,
                content: all,
                number: 0,
                total_elements: total,
            },
        })
    }

    async fn find_by_field(&self, field: CustomerField, value: Option<&str>) -> Result<Vec<Customer>, StoreError> {
        let mut matches: Vec<Customer> = self
            .read()?
            .values()
            .filter(|c| c.text(field) == value)
            .cloned()
            .collect();
        matches.sort_by_key(|c| c.id);
        Ok(matches)
    }

    async fn update(&self, customer: &Customer) -> Result<Option<Customer>, StoreError> {
        let mut rows = self.write()?;
        Ok(rows.get_mut(&customer.id).map(|existing| {
            *existing = customer.clone();
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.write()?.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        let mut rows = self.write()?;
        Ok(ids.iter().filter(|id| rows.remove(*id).is_some()).count() as u64)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut rows = self.write()?;
        let n = rows.len() as u64;
        rows.clear();
        Ok(n)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn draft(first: &str, last: Option<&str>) -> CustomerDraft {
        CustomerDraft {
            first_name: Some(first.into()),
            last_name: last.map(String::from),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let store = InMemoryCustomerStore::new();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let c = store.create(draft(&format!("c{i}"), None)).await.unwrap();
            assert!(!c.id.is_nil());
            ids.insert(c.id);
        }
        assert_eq!(ids.len(), 50);
        assert_eq!(store.count().await.unwrap(), 50);
    }

    #[tokio::test]
    async fn list_sorts_nulls_last_then_pages() {
        let store = InMemoryCustomerStore::new();
        store
            .create_all(vec![
                draft("a", Some("Silva")),
                draft("b", None),
                draft("c", Some("Alves")),
            ])
            .await
            .unwrap();

        let sort = Sort::by(CustomerField::LastName, Direction::Asc);
        let all = store.list(&sort, None).await.unwrap();
        let firsts: Vec<_> = all.content.iter().map(|c| c.first_name.clone().unwrap()).collect();
        assert_eq!(firsts, vec!["c", "a", "b"]);

        let page = store.list(&sort, Some(PageRequest::new(1, 2))).await.unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].first_name.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn text_sort_is_bytewise() {
        let store = InMemoryCustomerStore::new();
        store
            .create_all(vec![draft("a", Some("alves")), draft("b", Some("Silva"))])
            .await
            .unwrap();
        let asc = store.list(&Sort::by(CustomerField::LastName, Direction::Asc), None).await.unwrap();
        let lasts: Vec<_> = asc.content.iter().map(|c| c.last_name.clone().unwrap()).collect();
        assert_eq!(lasts, vec!["Silva", "alves"]);
    }

    #[tokio::test]
    async fn find_by_field_exact_and_null() {
        let store = InMemoryCustomerStore::new();
        store
            .create_all(vec![draft("Nino", Some("Tan")), draft("nino", None), draft("Nino", None)])
            .await
            .unwrap();
        let hits = store.find_by_field(CustomerField::FirstName, Some("Nino")).await.unwrap();
        assert_eq!(hits.len(), 2);
        let unset = store.find_by_field(CustomerField::LastName, None).await.unwrap();
        assert_eq!(unset.len(), 2);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = InMemoryCustomerStore::new();
        let ghost = Customer::from_draft(Uuid::new_v4(), CustomerDraft::default());
        assert_eq!(store.update(&ghost).await.unwrap(), None);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_variants() {
        let store = InMemoryCustomerStore::new();
        let created = store
            .create_all(vec![draft("a", None), draft("b", None), draft("c", None)])
            .await
            .unwrap();
        assert!(store.delete(created[0].id).await.unwrap());
        assert!(!store.delete(created[0].id).await.unwrap());
        let removed = store.delete_many(&[created[0].id, created[1].id]).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}

//! PostgreSQL-backed customer store, plus database bootstrap helpers.

use crate::error::StoreError;
use crate::model::{Customer, CustomerDraft, CustomerField, Page, PageRequest, Sort};
use crate::sql::{self, bind_query, bind_query_as, QueryBuf};
use crate::store::CustomerStore;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        PgCustomerStore { pool }
    }

    /// Create the database if needed, open a pool and make sure the customers table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        ensure_database_exists(database_url).await?;
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        crate::migration::ensure_customers_table(&pool).await?;
        Ok(PgCustomerStore::new(pool))
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Customer>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_query_as(sqlx::query_as::<_, Customer>(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Customer>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_query_as(sqlx::query_as::<_, Customer>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let done = bind_query(sqlx::query(&q.sql), &q.params).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let customer = Customer::from_draft(Uuid::new_v4(), draft);
        let q = sql::insert(&customer);
        self.fetch_optional(&q)
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
    }

    async fn create_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, StoreError> {
        let mut out = Vec::with_capacity(drafts.len());
        let mut tx = self.pool.begin().await?;
        for draft in drafts {
            let q = sql::insert(&Customer::from_draft(Uuid::new_v4(), draft));
            tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
            let row = bind_query_as(sqlx::query_as::<_, Customer>(&q.sql), &q.params)
                .fetch_one(&mut *tx)
                .await?;
            out.push(row);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        self.fetch_optional(&sql::select_by_id(id)).await
    }

    async fn list(&self, sort: &Sort, page: Option<PageRequest>) -> Result<Page<Customer>, StoreError> {
        let content = self.fetch_all(&sql::select_list(sort, page)).await?;
        Ok(match page {
            Some(p) => Page {
                content,
                number: p.number,
                size: p.size,
                total_elements: self.count().await?,
            },
            None => Page {
                size: content.len() as u32,
                total_elements: content.len() as u64,
                content,
                number: 0,
            },
        })
    }

    async fn find_by_field(&self, field: CustomerField, value: Option<&str>) -> Result<Vec<Customer>, StoreError> {
        self.fetch_all(&sql::select_by_field(field, value)).await
    }

    async fn update(&self, customer: &Customer) -> Result<Option<Customer>, StoreError> {
        self.fetch_optional(&sql::update(customer)).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.execute(&sql::delete_by_id(id)).await? > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.execute(&sql::delete_by_ids(ids)).await
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        self.execute(&sql::delete_all()).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let q = sql::count();
        let (n,): (i64,) = sqlx::query_as(&q.sql).fetch_one(&self.pool).await?;
        Ok(n.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_optional(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| StoreError::Unavailable(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url
        .get(scheme_end..)
        .and_then(|rest| rest.find('/'))
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| StoreError::Unavailable("DATABASE_URL: no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut split = path_and_query.splitn(2, '?');
    let db_name = split.next().unwrap_or("").trim();
    let query = split.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres{}", base, query);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_swaps_database_name() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@db:5432/customers").unwrap();
        assert_eq!(admin, "postgres://u:p@db:5432/postgres");
        assert_eq!(name, "customers");
    }

    #[test]
    fn admin_url_keeps_query_options() {
        let (admin, name) = parse_db_name_from_url("postgres://db/customers?sslmode=require").unwrap();
        assert_eq!(admin, "postgres://db/postgres?sslmode=require");
        assert_eq!(name, "customers");
    }

    #[test]
    fn url_without_path_is_rejected() {
        assert!(parse_db_name_from_url("postgres://db:5432").is_err());
    }

    #[test]
    fn quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}

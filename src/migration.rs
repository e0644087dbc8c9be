//! Idempotent DDL for the customers table.

use crate::error::StoreError;
use crate::model::CustomerField;
use crate::sql::CUSTOMERS_TABLE;
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `CREATE TABLE IF NOT EXISTS` for customers; text columns are nullable and carry no constraints.
pub fn customers_table_ddl() -> String {
    let columns: Vec<String> = CustomerField::ALL
        .iter()
        .map(|f| match f {
            CustomerField::Id => format!("{} UUID PRIMARY KEY", quote(f.column())),
            other => format!("{} TEXT", quote(other.column())),
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quote(CUSTOMERS_TABLE),
        columns.join(",\n    ")
    )
}

pub async fn ensure_customers_table(pool: &PgPool) -> Result<(), StoreError> {
    let ddl = customers_table_ddl();
    tracing::debug!(sql = %ddl, "ddl");
    sqlx::query(&ddl).execute(pool).await?;
    tracing::info!(table = CUSTOMERS_TABLE, "customers table ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_has_uuid_key_and_nullable_text() {
        let ddl = customers_table_ddl();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"customers\""));
        assert!(ddl.contains("\"id\" UUID PRIMARY KEY"));
        assert!(ddl.contains("\"job_title\" TEXT"));
        assert!(!ddl.contains("UNIQUE"));
        assert!(!ddl.contains("NOT NULL"));
    }
}

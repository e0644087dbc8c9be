//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the customers table.
//! Identifiers come only from `CustomerField`; values are always bound.

use crate::model::{Customer, CustomerField, PageRequest, Sort};
use crate::sql::BindValue;
use uuid::Uuid;

pub const CUSTOMERS_TABLE: &str = "customers";

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn column_list() -> String {
    CustomerField::ALL
        .iter()
        .map(|f| quoted(f.column()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sort key for one field. Text columns compare bytewise (`COLLATE "C"`), matching `str` ordering.
fn sort_key(field: CustomerField) -> String {
    match field {
        CustomerField::Id => quoted(field.column()),
        text => format!("{} COLLATE \"C\"", quoted(text.column())),
    }
}

/// ORDER BY for a sort, always ending on id so paging is stable.
fn order_clause(sort: &Sort) -> String {
    let mut parts: Vec<String> = sort
        .0
        .iter()
        .map(|o| format!("{} {}", sort_key(o.field), o.direction.as_sql()))
        .collect();
    if !sort.0.iter().any(|o| o.field == CustomerField::Id) {
        parts.push(format!("{} ASC", quoted(CustomerField::Id.column())));
    }
    format!(" ORDER BY {}", parts.join(", "))
}

pub fn select_by_id(id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::default();
    let n = q.push_param(BindValue::Uuid(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(),
        quoted(CUSTOMERS_TABLE),
        quoted(CustomerField::Id.column()),
        n
    );
    q
}

/// SELECT all rows in sort order; LIMIT/OFFSET when a page is requested.
pub fn select_list(sort: &Sort, page: Option<PageRequest>) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut sql = format!("SELECT {} FROM {}{}", column_list(), quoted(CUSTOMERS_TABLE), order_clause(sort));
    if let Some(page) = page {
        let limit = q.push_param(BindValue::Int(i64::from(page.size)));
        let offset = q.push_param(BindValue::Int(page.offset() as i64));
        sql.push_str(&format!(" LIMIT ${} OFFSET ${}", limit, offset));
    }
    q.sql = sql;
    q
}

/// Exact match on one text column; a missing value matches NULL.
pub fn select_by_field(field: CustomerField, value: Option<&str>) -> QueryBuf {
    let mut q = QueryBuf::default();
    let predicate = match value {
        Some(v) => {
            let n = q.push_param(BindValue::Text(Some(v.to_string())));
            format!("{} = ${}", quoted(field.column()), n)
        }
        None => format!("{} IS NULL", quoted(field.column())),
    };
    q.sql = format!(
        "SELECT {} FROM {} WHERE {}{}",
        column_list(),
        quoted(CUSTOMERS_TABLE),
        predicate,
        order_clause(&Sort::unsorted())
    );
    q
}

pub fn count() -> QueryBuf {
    QueryBuf {
        sql: format!("SELECT COUNT(*) FROM {}", quoted(CUSTOMERS_TABLE)),
        params: Vec::new(),
    }
}

pub fn insert(customer: &Customer) -> QueryBuf {
    let mut q = QueryBuf::default();
    let placeholders: Vec<String> = CustomerField::ALL
        .iter()
        .map(|f| {
            let v = match f {
                CustomerField::Id => BindValue::Uuid(customer.id),
                other => BindValue::Text(customer.text(*other).map(str::to_string)),
            };
            format!("${}", q.push_param(v))
        })
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(CUSTOMERS_TABLE),
        column_list(),
        placeholders.join(", "),
        column_list()
    );
    q
}

/// UPDATE every text column of the row with `customer.id`.
pub fn update(customer: &Customer) -> QueryBuf {
    let mut q = QueryBuf::default();
    let id_param = q.push_param(BindValue::Uuid(customer.id));
    let sets: Vec<String> = CustomerField::SEARCHABLE
        .iter()
        .map(|f| {
            let n = q.push_param(BindValue::Text(customer.text(*f).map(str::to_string)));
            format!("{} = ${}", quoted(f.column()), n)
        })
        .collect();
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(CUSTOMERS_TABLE),
        sets.join(", "),
        quoted(CustomerField::Id.column()),
        id_param,
        column_list()
    );
    q
}

pub fn delete_by_id(id: Uuid) -> QueryBuf {
    let mut q = QueryBuf::default();
    let n = q.push_param(BindValue::Uuid(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(CUSTOMERS_TABLE),
        quoted(CustomerField::Id.column()),
        n
    );
    q
}

pub fn delete_by_ids(ids: &[Uuid]) -> QueryBuf {
    let mut q = QueryBuf::default();
    let n = q.push_param(BindValue::UuidList(ids.to_vec()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ANY(${})",
        quoted(CUSTOMERS_TABLE),
        quoted(CustomerField::Id.column()),
        n
    );
    q
}

pub fn delete_all() -> QueryBuf {
    QueryBuf {
        sql: format!("DELETE FROM {}", quoted(CUSTOMERS_TABLE)),
        params: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerDraft, Direction};

    #[test]
    fn list_without_page_orders_by_id() {
        let q = select_list(&Sort::unsorted(), None);
        assert!(q.sql.ends_with("ORDER BY \"id\" ASC"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn list_with_sort_and_page() {
        let q = select_list(&Sort::by(CustomerField::LastName, Direction::Desc), Some(PageRequest::new(2, 10)));
        assert!(q
            .sql
            .contains("ORDER BY \"last_name\" COLLATE \"C\" DESC, \"id\" ASC LIMIT $1 OFFSET $2"));
        assert_eq!(q.params, vec![BindValue::Int(10), BindValue::Int(20)]);
    }

    #[test]
    fn text_sort_keys_use_byte_collation() {
        let mut sort = Sort::unsorted();
        sort.push_param("firstName,email").unwrap();
        let q = select_list(&sort, None);
        assert!(q
            .sql
            .ends_with("ORDER BY \"first_name\" COLLATE \"C\" ASC, \"email\" COLLATE \"C\" ASC, \"id\" ASC"));
    }

    #[test]
    fn sort_by_id_not_duplicated() {
        let q = select_list(&Sort::by(CustomerField::Id, Direction::Desc), None);
        assert!(q.sql.ends_with("ORDER BY \"id\" DESC"));
    }

    #[test]
    fn field_lookup_binds_value() {
        let q = select_by_field(CustomerField::Email, Some("nino@the9o.com"));
        assert!(q.sql.contains("WHERE \"email\" = $1"));
        assert_eq!(q.params, vec![BindValue::Text(Some("nino@the9o.com".into()))]);
    }

    #[test]
    fn field_lookup_without_value_matches_null() {
        let q = select_by_field(CustomerField::Gender, None);
        assert!(q.sql.contains("WHERE \"gender\" IS NULL"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_binds_all_columns() {
        let c = Customer::from_draft(Uuid::new_v4(), CustomerDraft::default());
        let q = insert(&c);
        assert!(q.sql.starts_with(
            "INSERT INTO \"customers\" (\"id\", \"first_name\", \"last_name\", \"email\", \"gender\", \"job_title\") VALUES ($1, $2, $3, $4, $5, $6)"
        ));
        assert_eq!(q.params.len(), 6);
        assert_eq!(q.params[0], BindValue::Uuid(c.id));
        assert_eq!(q.params[1], BindValue::Text(None));
    }

    #[test]
    fn update_sets_text_columns_only() {
        let c = Customer::from_draft(Uuid::new_v4(), CustomerDraft::new("a", "b", "c", "d", "e"));
        let q = update(&c);
        assert!(q.sql.contains("SET \"first_name\" = $2, \"last_name\" = $3, \"email\" = $4, \"gender\" = $5, \"job_title\" = $6 WHERE \"id\" = $1"));
        assert_eq!(q.params.len(), 6);
    }

    #[test]
    fn delete_many_uses_any() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let q = delete_by_ids(&ids);
        assert!(q.sql.ends_with("WHERE \"id\" = ANY($1)"));
        assert_eq!(q.params, vec![BindValue::UuidList(ids)]);
    }
}

//! Typed bind values for built queries.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};
use uuid::Uuid;

/// A value bound to a `$n` placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    Uuid(Uuid),
    UuidList(Vec<Uuid>),
    Text(Option<String>),
    Int(i64),
}

/// Bind every param in order onto a plain query.
pub fn bind_query<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p {
            BindValue::Uuid(u) => query.bind(*u),
            BindValue::UuidList(us) => query.bind(us.as_slice()),
            BindValue::Text(s) => query.bind(s.as_deref()),
            BindValue::Int(n) => query.bind(*n),
        };
    }
    query
}

/// Bind every param in order onto a typed query.
pub fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            BindValue::Uuid(u) => query.bind(*u),
            BindValue::UuidList(us) => query.bind(us.as_slice()),
            BindValue::Text(s) => query.bind(s.as_deref()),
            BindValue::Int(n) => query.bind(*n),
        };
    }
    query
}

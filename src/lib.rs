//! Customers API: customer records over REST with HAL links, public reads and admin-only writes.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod security;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load_from_env, load_with, ApiConfig, Credentials, StoreConfig};
pub use error::{AppError, ConfigError, StoreError};
pub use migration::ensure_customers_table;
pub use model::{Customer, CustomerDraft, CustomerField, CustomerPatch};
pub use routes::app;
pub use security::{Role, SecurityPolicy};
pub use service::CustomerService;
pub use state::AppState;
pub use store::{CustomerStore, InMemoryCustomerStore, PgCustomerStore};

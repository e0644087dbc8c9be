//! Runtime configuration types.

use std::fmt;
use std::net::SocketAddr;

/// The single principal allowed to authenticate. Holds both `USER` and `ADMIN`.
///
/// `Debug` redacts the password so the config can be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Where customers are persisted.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process-local map; contents are lost on restart.
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Memory => f.write_str("Memory"),
            StoreConfig::Postgres { max_connections, .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .field("max_connections", max_connections)
                .finish(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            default_page_size: 20,
            max_page_size: 2000,
        }
    }
}

/// Everything the service needs at startup, passed explicitly to each component.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub credentials: Credentials,
    /// Overrides the `Host`-derived base for hypermedia links, e.g. `https://api.example.com`.
    pub public_base_url: Option<String>,
    pub paging: PagingConfig,
    pub max_body_bytes: usize,
}

impl ApiConfig {
    /// In-memory store, default paging, given credentials. Used by tests and embedders.
    pub fn with_credentials(username: &str, password: &str) -> Self {
        ApiConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            store: StoreConfig::Memory,
            credentials: Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
            public_base_url: None,
            paging: PagingConfig::default(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

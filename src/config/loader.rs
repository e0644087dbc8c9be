//! Load `ApiConfig` from environment variables (a `.env` file is honoured by the binary).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const ENV_API_USER: &str = "API_USER";
pub const ENV_API_PASS: &str = "API_PASS";
pub const ENV_PUBLIC_BASE_URL: &str = "PUBLIC_BASE_URL";
pub const ENV_DEFAULT_PAGE_SIZE: &str = "DEFAULT_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "MAX_PAGE_SIZE";
pub const ENV_MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_API_USER: &str = "admin";

/// Build config from the process environment.
pub fn load_from_env() -> Result<ApiConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Build config from an arbitrary key lookup. Blank values count as unset.
/// Credentials are taken verbatim; only an empty value counts as unset.
pub fn load_with<F>(lookup: F) -> Result<ApiConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let get_raw = |key: &str| lookup(key).filter(|v| !v.is_empty());

    let bind_addr: SocketAddr = parse_or(&get, ENV_BIND_ADDR, DEFAULT_BIND_ADDR.parse().ok())?;

    let store = match get(ENV_DATABASE_URL) {
        Some(database_url) => StoreConfig::Postgres {
            database_url,
            max_connections: parse_or(&get, ENV_DATABASE_MAX_CONNECTIONS, Some(5))?,
        },
        None => StoreConfig::Memory,
    };

    let credentials = Credentials {
        username: get_raw(ENV_API_USER).unwrap_or_else(|| DEFAULT_API_USER.to_string()),
        password: get_raw(ENV_API_PASS).ok_or(ConfigError::Missing(ENV_API_PASS))?,
    };

    let defaults = PagingConfig::default();
    let paging = PagingConfig {
        default_page_size: parse_or(&get, ENV_DEFAULT_PAGE_SIZE, Some(defaults.default_page_size))?,
        max_page_size: parse_or(&get, ENV_MAX_PAGE_SIZE, Some(defaults.max_page_size))?,
    };

    let config = ApiConfig {
        bind_addr,
        store,
        credentials,
        public_base_url: get(ENV_PUBLIC_BASE_URL).map(|u| u.trim_end_matches('/').to_string()),
        paging,
        max_body_bytes: parse_or(&get, ENV_MAX_BODY_BYTES, Some(1024 * 1024))?,
    };
    validate(&config)?;
    Ok(config)
}

fn parse_or<T, G>(get: &G, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("'{}': {}", raw, e),
        }),
        None => default.ok_or(ConfigError::Missing(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn minimal_env_uses_defaults() {
        let config = load_with(lookup(&[(ENV_API_PASS, "pw")])).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.credentials.username, "admin");
        assert_eq!(config.credentials.password, "pw");
        assert_eq!(config.paging, PagingConfig::default());
        assert_eq!(config.public_base_url, None);
    }

    #[test]
    fn missing_password_is_rejected() {
        let err = load_with(lookup(&[(ENV_API_USER, "ops")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_API_PASS)));
    }

    #[test]
    fn empty_password_counts_as_missing() {
        let err = load_with(lookup(&[(ENV_API_PASS, "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_API_PASS)));
    }

    #[test]
    fn credentials_keep_surrounding_whitespace() {
        let config = load_with(lookup(&[(ENV_API_USER, " ops"), (ENV_API_PASS, " pw ")])).unwrap();
        assert_eq!(config.credentials.username, " ops");
        assert_eq!(config.credentials.password, " pw ");
    }

    #[test]
    fn database_url_selects_postgres() {
        let config = load_with(lookup(&[
            (ENV_API_PASS, "pw"),
            (ENV_DATABASE_URL, "postgres://localhost/customers"),
            (ENV_DATABASE_MAX_CONNECTIONS, "12"),
        ]))
        .unwrap();
        assert_eq!(
            config.store,
            StoreConfig::Postgres {
                database_url: "postgres://localhost/customers".into(),
                max_connections: 12,
            }
        );
    }

    #[test]
    fn invalid_number_names_the_key() {
        let err = load_with(lookup(&[(ENV_API_PASS, "pw"), (ENV_MAX_PAGE_SIZE, "lots")])).unwrap_err();
        match err {
            ConfigError::Invalid { key, .. } => assert_eq!(key, ENV_MAX_PAGE_SIZE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn public_base_url_trailing_slash_trimmed() {
        let config = load_with(lookup(&[
            (ENV_API_PASS, "pw"),
            (ENV_PUBLIC_BASE_URL, "https://api.the9o.com/"),
        ]))
        .unwrap();
        assert_eq!(config.public_base_url.as_deref(), Some("https://api.the9o.com"));
    }
}

//! Config validation: values that parse but cannot work together.

use crate::config::{ApiConfig, StoreConfig};
use crate::error::ConfigError;

pub fn validate(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.credentials.username.is_empty() {
        return Err(ConfigError::Invalid {
            key: "API_USER",
            reason: "must not be empty".into(),
        });
    }
    if config.credentials.username.contains(':') {
        // Basic auth splits user-id and password on the first colon.
        return Err(ConfigError::Invalid {
            key: "API_USER",
            reason: "must not contain ':'".into(),
        });
    }
    if config.credentials.password.is_empty() {
        return Err(ConfigError::Missing("API_PASS"));
    }

    let paging = &config.paging;
    if paging.max_page_size == 0 {
        return Err(ConfigError::Invalid {
            key: "MAX_PAGE_SIZE",
            reason: "must be at least 1".into(),
        });
    }
    if paging.default_page_size == 0 || paging.default_page_size > paging.max_page_size {
        return Err(ConfigError::Invalid {
            key: "DEFAULT_PAGE_SIZE",
            reason: format!("must be between 1 and MAX_PAGE_SIZE ({})", paging.max_page_size),
        });
    }

    if let StoreConfig::Postgres {
        database_url,
        max_connections,
    } = &config.store
    {
        if !(database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")) {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                reason: "expected a postgres:// or postgresql:// URL".into(),
            });
        }
        if *max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
    }

    if let Some(base) = &config.public_base_url {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "PUBLIC_BASE_URL",
                reason: "expected an http:// or https:// URL".into(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_config_is_valid() {
        assert!(validate(&ApiConfig::with_credentials("admin", "pw")).is_ok());
    }

    #[test]
    fn username_with_colon_rejected() {
        let config = ApiConfig::with_credentials("ad:min", "pw");
        assert!(matches!(validate(&config), Err(ConfigError::Invalid { key: "API_USER", .. })));
    }

    #[test]
    fn default_page_size_above_max_rejected() {
        let mut config = ApiConfig::with_credentials("admin", "pw");
        config.paging.default_page_size = 50;
        config.paging.max_page_size = 10;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Invalid { key: "DEFAULT_PAGE_SIZE", .. })
        ));
    }

    #[test]
    fn non_postgres_url_rejected() {
        let mut config = ApiConfig::with_credentials("admin", "pw");
        config.store = StoreConfig::Postgres {
            database_url: "mysql://localhost/customers".into(),
            max_connections: 5,
        };
        assert!(matches!(validate(&config), Err(ConfigError::Invalid { key: "DATABASE_URL", .. })));
    }
}

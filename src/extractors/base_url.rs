//! Absolute base URL for hypermedia links.

use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Header set by reverse proxies carrying the client-facing scheme.
pub const FORWARDED_PROTO_HEADER: &str = "X-Forwarded-Proto";

/// `PUBLIC_BASE_URL` when configured, else `{scheme}://{Host}`, else `http://localhost`.
/// Never ends with a slash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(pub String);

impl BaseUrl {
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BaseUrl {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(base) = &state.config.public_base_url {
            return Ok(BaseUrl(base.clone()));
        }
        let header_str = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let scheme = header_str(FORWARDED_PROTO_HEADER)
            .filter(|s| s == "http" || s == "https")
            .unwrap_or_else(|| "http".to_string());
        let host = header_str(header::HOST.as_str())
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());
        Ok(BaseUrl(format!("{}://{}", scheme, host)))
    }
}

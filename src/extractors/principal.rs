//! The authenticated caller, if the security middleware found one.

use crate::security::Principal;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

#[derive(Clone, Debug)]
pub struct CurrentPrincipal(pub Option<Principal>);

impl CurrentPrincipal {
    /// Username for logs; `anonymous` when unauthenticated.
    pub fn name(&self) -> &str {
        self.0.as_ref().map(|p| p.username.as_str()).unwrap_or("anonymous")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentPrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

//! Authentication and authorization middleware, evaluated before any handler runs.

use crate::error::AppError;
use crate::security::{Principal, SecurityPolicy};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};

/// Who the `Authorization` header says the caller is.
#[derive(Debug)]
enum Caller {
    Anonymous,
    Authenticated(Principal),
}

/// Non-Basic schemes are ignored; a Basic header that is malformed or wrong is rejected outright,
/// even on public routes.
fn identify(policy: &SecurityPolicy, headers: &HeaderMap) -> Result<Caller, AppError> {
    let Some(raw) = headers.get(header::AUTHORIZATION) else {
        return Ok(Caller::Anonymous);
    };
    let is_basic = raw
        .to_str()
        .ok()
        .and_then(|v| v.split_whitespace().next())
        .map(|scheme| scheme.eq_ignore_ascii_case("basic"))
        .unwrap_or(false);
    if !is_basic {
        tracing::debug!("ignoring non-Basic authorization scheme");
        return Ok(Caller::Anonymous);
    }
    let basic = headers
        .typed_get::<Authorization<Basic>>()
        .ok_or_else(|| AppError::Unauthorized("malformed Basic credentials".into()))?;
    policy
        .account()
        .authenticate(basic.username(), basic.password())
        .map(Caller::Authenticated)
        .ok_or_else(|| AppError::Unauthorized("bad credentials".into()))
}

/// Resolve the caller, enforce the rule table, then hand the request on with the
/// principal (if any) in its extensions.
pub async fn authorize(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let policy = state.security.as_ref();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let caller = match identify(policy, request.headers()) {
        Ok(caller) => caller,
        Err(e) => {
            tracing::warn!(%method, %path, reason = %e, "authentication failed");
            return e.into_response();
        }
    };

    if let Some(required) = policy.required_role(&method, &path) {
        match &caller {
            Caller::Anonymous => {
                tracing::warn!(%method, %path, "unauthenticated request to protected route");
                return AppError::Unauthorized("full authentication is required".into()).into_response();
            }
            Caller::Authenticated(principal) if !principal.has_role(required) => {
                tracing::warn!(%method, %path, user = %principal.username, role = required.as_str(), "access denied");
                return AppError::Forbidden(format!("role {} required", required.as_str())).into_response();
            }
            Caller::Authenticated(_) => {}
        }
    }

    if let Caller::Authenticated(principal) = caller {
        request.extensions_mut().insert(principal);
    }
    next.run(request).await
}

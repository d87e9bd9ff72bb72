//! Bearer-token authentication gate.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use bookshelf_authz::Authenticator;

use crate::error::AppError;

/// Middleware that resolves the caller before any handler runs.
///
/// On success the [`bookshelf_authz::CurrentUser`] is stored in the request
/// extensions; handlers read it with `Extension<CurrentUser>`.
pub async fn require_auth(
    State(authenticator): State<Arc<dyn Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(req.headers())?;

    let user = authenticator
        .authenticate(token)
        .await
        .map_err(|err| AppError::Internal(anyhow::Error::new(err)))?
        .ok_or_else(|| AppError::unauthorized("invalid credentials"))?;

    tracing::debug!(user_id = %user.id, "request authenticated");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::unauthorized("malformed authorization header"))?;

    if token.is_empty() {
        return Err(AppError::unauthorized("missing bearer token"));
    }

    Ok(token)
}

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use super::SessionCtx;

/// Extractor side of the middleware -> handler handoff.
/// Assumes the gate middleware already inserted a SessionCtx into
/// request.extensions(); a route reached without one is not
/// authenticated (gate not applied), so deny.
impl<S> FromRequestParts<S> for SessionCtx
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionCtx>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

//! Request gate: bearer token -> session resolution -> SessionCtx in
//! request extensions.
//!
//! This is the only place that looks at the `Authorization` header. The
//! scheme prefix is a boundary detail handled here; everything past this
//! point treats the token as an opaque key. A request that cannot be
//! resolved never reaches protected handlers.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::SessionCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Applies the session gate to every route in `router`.
///
/// Ex:
/// ```ignore
/// let v1 = api::v1::routes::protected_routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor on its own, so the
    // state is passed explicitly via from_fn_with_state.
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Missing header is the one case decided before any lookup.
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = strip_bearer_scheme(auth);

    // Resolution failures already warned about themselves; the gate only
    // needs the uniform outcome.
    let session = state.resolver.resolve(token).await?;

    // middleware -> extractor handoff
    req.extensions_mut().insert(SessionCtx::new(session));

    Ok(next.run(req).await)
}

/// Strips an optional, case-insensitive `bearer ` scheme prefix.
///
/// Clients send `Authorization: bearer {token}`; some omit the scheme.
/// The remainder is the opaque cache/authority key either way.
fn strip_bearer_scheme(header_value: &str) -> &str {
    const SCHEME: &str = "bearer ";

    match header_value.get(..SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SCHEME) => {
            header_value[SCHEME.len()..].trim_start()
        }
        _ => header_value,
    }
}

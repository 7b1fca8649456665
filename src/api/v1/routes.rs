/*
 * Responsibility
 * - v1 URL structure
 * - Which routes sit behind the session gate is decided here, not in
 *   the handlers
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::me::me;

/// Routes that require a resolved session. The caller wraps this router
/// with the gate middleware before nesting it.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/*
 * Responsibility
 * - POST /internal/sessions/invalidate: one concrete transport for the
 *   revocation signal (logout, administrative kill)
 * - The invalidator itself is transport-agnostic; a queue consumer would
 *   call the same single-argument operation
 */
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InvalidateRequest {
    pub token: String,
}

/// Idempotent: unknown or already-expired tokens still return 204.
pub async fn invalidate_session(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> StatusCode {
    state.invalidator.invalidate(&req.token);
    StatusCode::NO_CONTENT
}

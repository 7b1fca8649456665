/*
 * Responsibility
 * - GET /me: echo the resolved identity back to the caller
 * - Demonstrates the SessionCtx handoff; real protected handlers hang
 *   off the same gated router
 */
use axum::Json;

use crate::api::v1::extractors::SessionCtx;
use crate::services::session::User;

pub async fn me(ctx: SessionCtx) -> Json<User> {
    Json(ctx.session.user)
}

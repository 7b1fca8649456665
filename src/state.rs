/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone: resolver/invalidator hold Arcs internally
 */
use crate::services::session::{SessionInvalidator, SessionResolver};

#[derive(Clone)]
pub struct AppState {
    pub resolver: SessionResolver,
    pub invalidator: SessionInvalidator,
}

impl AppState {
    pub fn new(resolver: SessionResolver, invalidator: SessionInvalidator) -> Self {
        Self {
            resolver,
            invalidator,
        }
    }
}

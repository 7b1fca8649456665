/*
 * Responsibility
 * - The type handlers see as "the authenticated request context"
 * - The gate middleware resolves and inserts it into request extensions;
 *   handlers only ever receive this type
 *
 * Notes
 * - Cache/authority lookup is the middleware/services side's job
 * - Constructed fresh per request, owned by the request's lifetime,
 *   never shared across requests
 */

use crate::services::session::Session;

/// Context attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct SessionCtx {
    pub session: Session,
}

impl SessionCtx {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

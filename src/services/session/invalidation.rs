//! Invalidation handler: drops a token's cache entry when an external
//! revocation signal arrives (logout, administrative session kill).
//!
//! The signal transport is not our business; queue consumer, webhook or
//! internal endpoint, everything funnels into the single `invalidate`
//! call. The next resolution for that token goes back to the authority.

use std::sync::Arc;

use super::cache::SessionCache;

#[derive(Clone)]
pub struct SessionInvalidator {
    cache: Arc<SessionCache>,
}

impl SessionInvalidator {
    pub fn new(cache: Arc<SessionCache>) -> Self {
        Self { cache }
    }

    /// Removes the cached session for `token`, if any.
    ///
    /// Idempotent: invalidating an absent or already-expired token is a
    /// silent no-op.
    pub fn invalidate(&self, token: &str) {
        if self.cache.delete(token) {
            tracing::info!("session invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::types::User;
    use std::time::Duration;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ann".to_string(),
            login: "ann".to_string(),
            permissions: vec!["read".to_string()],
        }
    }

    #[test]
    fn invalidate_removes_cached_session() {
        let cache = Arc::new(SessionCache::new(Duration::from_secs(3600)));
        cache.set("abc", user());

        let invalidator = SessionInvalidator::new(cache.clone());
        invalidator.invalidate("abc");

        assert_eq!(cache.get("abc"), None);
    }

    #[test]
    fn invalidate_twice_is_a_no_op_the_second_time() {
        let cache = Arc::new(SessionCache::new(Duration::from_secs(3600)));
        cache.set("abc", user());

        let invalidator = SessionInvalidator::new(cache.clone());
        invalidator.invalidate("abc");
        invalidator.invalidate("abc");
        invalidator.invalidate("never-cached");

        assert_eq!(cache.get("abc"), None);
    }
}

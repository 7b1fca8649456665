//! Two-tier session resolution: local cache first, session authority on a
//! miss, fail-closed on anything ambiguous.
//!
//! The resolver is the only component allowed to decide "authenticated or
//! not". Internally it distinguishes a missing credential from an
//! unreachable authority from an authority refusal, but callers see one
//! uniform `Rejected` so nothing upstream can leak the difference.

use std::sync::Arc;

use thiserror::Error;

use super::authority::SessionAuthority;
use super::cache::SessionCache;
use super::types::Session;

/// The uniform unauthenticated outcome.
///
/// Deliberately carries no reason: whether the token was absent, unknown,
/// expired upstream or the authority was down, the caller only learns
/// "not authenticated".
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unauthorized")]
pub struct Rejected;

/// Resolves bearer tokens into sessions.
///
/// Cheap to clone; both tiers are behind `Arc`. One resolver is built at
/// startup and shared through `AppState` with every in-flight request.
#[derive(Clone)]
pub struct SessionResolver {
    cache: Arc<SessionCache>,
    authority: Arc<dyn SessionAuthority>,
}

impl SessionResolver {
    pub fn new(cache: Arc<SessionCache>, authority: Arc<dyn SessionAuthority>) -> Self {
        Self { cache, authority }
    }

    /// Resolves `token` to a `Session`, or rejects.
    ///
    /// - Empty token: rejected immediately, no cache or network I/O.
    /// - Cache hit: session returned without touching the authority.
    /// - Cache miss: one authority call; on success the user is written
    ///   through to the cache under `token`.
    ///
    /// Concurrent misses for the same token may each reach the authority;
    /// the last cache write prevails. Coalescing those calls would be an
    /// optimization, not a correctness fix.
    pub async fn resolve(&self, token: &str) -> Result<Session, Rejected> {
        if token.is_empty() {
            return Err(Rejected);
        }

        if let Some(user) = self.cache.get(token) {
            tracing::debug!("session resolved from cache");
            return Ok(Session {
                token: token.to_string(),
                user,
            });
        }

        match self.authority.resolve_current_user(token).await {
            Ok(user) => {
                self.cache.set(token, user.clone());
                Ok(Session {
                    token: token.to_string(),
                    user,
                })
            }
            Err(err) => {
                // Unreachable and Rejected degrade identically: deny.
                tracing::warn!(error = %err, "session resolution failed");
                Err(Rejected)
            }
        }
    }
}

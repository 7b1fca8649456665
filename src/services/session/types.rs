/*
 * Responsibility
 * - Shared session types: the authority-owned User record and the
 *   token/User pairing produced by the resolver
 * - Resolution/caching logic lives in cache.rs / resolver.rs, not here
 */
use serde::{Deserialize, Serialize};

/// Identity record owned by the session authority.
///
/// Immutable once resolved; the cache stores it by value and hands out
/// clones. Permission strings are passed through as-is, their semantics
/// belong to the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub login: String,
    pub permissions: Vec<String>,
}

/// A bearer token paired with the User it currently authenticates.
///
/// Created on successful resolution and never mutated afterwards. Lives
/// only for the duration of a request (or until its cache entry expires);
/// nothing here survives the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

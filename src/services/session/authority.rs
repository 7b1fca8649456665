//! Session authority client: translates a bearer token into a User by
//! asking the external system of record.
//!
//! The trait exists so the resolver can be exercised without a network;
//! the HTTP implementation is what production wires in.
//!
//! Policy:
//! - Single attempt per resolution. Retry/backoff, if ever wanted,
//!   belongs to the caller.
//! - Transport failures and authority refusals are distinct variants,
//!   but the resolver collapses both into the same rejection.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::User;

/// Authority-layer errors.
///
/// Kept separate from `AppError` so the resolver can make the fail-closed
/// decision explicitly instead of catching a blanket error.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// Network-level failure: connect error, timeout, malformed payload.
    #[error("session authority unreachable: {0}")]
    Unreachable(String),

    /// The authority answered and declined the token.
    #[error("session authority rejected the token (status {status})")]
    Rejected { status: u16 },
}

#[async_trait]
pub trait SessionAuthority: Send + Sync + 'static {
    /// Resolves the user currently authenticated by `token`.
    async fn resolve_current_user(&self, token: &str) -> Result<User, AuthorityError>;
}

/// Success payload envelope: `{"result": {id, name, login, permissions}}`.
#[derive(Debug, Deserialize)]
struct CurrentUserResponse {
    result: User,
}

/// HTTP client for the session authority.
///
/// Issues `GET {base_url}/v1/users/current` with the raw token forwarded
/// in the `Authorization` header. The request timeout is set on the inner
/// client so a slow authority can never pin a request path indefinitely.
#[derive(Debug, Clone)]
pub struct HttpSessionAuthority {
    client: reqwest::Client,
    current_user_url: Url,
}

impl HttpSessionAuthority {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, AuthorityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthorityError::Unreachable(e.to_string()))?;

        let current_user_url = base_url
            .join("v1/users/current")
            .map_err(|e| AuthorityError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            current_user_url,
        })
    }
}

#[async_trait]
impl SessionAuthority for HttpSessionAuthority {
    async fn resolve_current_user(&self, token: &str) -> Result<User, AuthorityError> {
        let response = self
            .client
            .get(self.current_user_url.clone())
            .header(reqwest::header::AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| AuthorityError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthorityError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: CurrentUserResponse = response
            .json()
            .await
            .map_err(|e| AuthorityError::Unreachable(e.to_string()))?;

        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Request,
        http::{StatusCode, header},
        routing::get,
    };
    use serde_json::json;

    /// Binds a throwaway authority on 127.0.0.1:0 and returns its base URL.
    async fn spawn_authority(app: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    #[tokio::test]
    async fn resolves_user_from_result_envelope() {
        let app = Router::new().route(
            "/v1/users/current",
            get(|req: Request| async move {
                // The raw token must be forwarded verbatim.
                assert_eq!(
                    req.headers().get(header::AUTHORIZATION).unwrap(),
                    "tok-abc"
                );
                Json(json!({
                    "result": {
                        "id": "u1",
                        "name": "Ann",
                        "login": "ann",
                        "permissions": ["read"]
                    }
                }))
            }),
        );
        let base = spawn_authority(app).await;

        let authority = HttpSessionAuthority::new(&base, Duration::from_secs(1)).unwrap();
        let user = authority.resolve_current_user("tok-abc").await.unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.login, "ann");
        assert_eq!(user.permissions, vec!["read".to_string()]);
    }

    #[tokio::test]
    async fn non_success_status_maps_to_rejected() {
        let app = Router::new().route(
            "/v1/users/current",
            get(|| async { StatusCode::UNAUTHORIZED }),
        );
        let base = spawn_authority(app).await;

        let authority = HttpSessionAuthority::new(&base, Duration::from_secs(1)).unwrap();
        let err = authority.resolve_current_user("bad").await.unwrap_err();

        assert!(matches!(err, AuthorityError::Rejected { status: 401 }));
    }

    #[tokio::test]
    async fn connect_failure_maps_to_unreachable() {
        // Nothing listens here: bind to grab a free port, then drop it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{addr}/")).unwrap();
        let authority = HttpSessionAuthority::new(&base, Duration::from_millis(500)).unwrap();
        let err = authority.resolve_current_user("xyz").await.unwrap_err();

        assert!(matches!(err, AuthorityError::Unreachable(_)));
    }
}

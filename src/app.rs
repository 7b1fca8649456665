/*
 * Responsibility
 * - Config loading -> dependency construction -> Router assembly
 * - Session gate and trace middleware application
 * - axum::serve() startup; the cache sweeper lives as long as the server
 */
use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::{health::health, sessions::invalidate_session};
use crate::config::{Config, ConfigError};
use crate::error::AppError;
use crate::middleware;
use crate::services::session::{
    HttpSessionAuthority, SessionCache, SessionInvalidator, SessionResolver, SweeperHandle,
};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,session_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    tracing::info!(
        authority = %config.authority_base_url,
        ttl_secs = config.session_ttl.as_secs(),
        sweep_secs = config.sweep_interval.as_secs(),
        "starting session gate on {}",
        config.addr
    );

    // The sweeper handle must outlive the server; dropping it stops the
    // background eviction task.
    let (state, _sweeper) = build_state(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config: &Config) -> Result<(AppState, SweeperHandle), AppError> {
    let cache = Arc::new(SessionCache::new(config.session_ttl));
    let sweeper = cache.spawn_sweeper(config.sweep_interval);

    // The client only fails to build on a bad base URL, so report it as
    // the configuration problem it is.
    let authority = HttpSessionAuthority::new(&config.authority_base_url, config.authority_timeout)
        .map_err(|_| ConfigError::Invalid("AUTHORITY_BASE_URL"))?;
    let authority = Arc::new(authority);

    let state = AppState::new(
        SessionResolver::new(cache.clone(), authority),
        SessionInvalidator::new(cache),
    );

    Ok((state, sweeper))
}

pub fn build_router(state: AppState) -> Router {
    let protected = middleware::auth::access::apply(api::v1::routes::protected_routes(), state.clone());

    Router::new()
        .route("/health", get(health))
        // Revocation intake; reachable without a session on purpose
        // (the signal arrives from inside the deployment, not from the
        // authenticated client).
        .route("/internal/sessions/invalidate", post(invalidate_session))
        .nest("/api/v1", protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::authority::AuthorityError;
    use crate::services::session::{SessionAuthority, User};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    struct CountingAuthority {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionAuthority for CountingAuthority {
        async fn resolve_current_user(&self, token: &str) -> Result<User, AuthorityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token == "abc" {
                Ok(User {
                    id: "u1".to_string(),
                    name: "Ann".to_string(),
                    login: "ann".to_string(),
                    permissions: vec!["read".to_string()],
                })
            } else {
                Err(AuthorityError::Rejected { status: 401 })
            }
        }
    }

    fn test_app() -> (Router, Arc<CountingAuthority>) {
        let authority = Arc::new(CountingAuthority {
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(SessionCache::new(Duration::from_secs(3600)));
        let state = AppState::new(
            SessionResolver::new(cache.clone(), authority.clone()),
            SessionInvalidator::new(cache),
        );
        (build_router(state), authority)
    }

    fn authed(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, "bearer abc")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_reachable_without_a_token() {
        let (app, authority) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(authority.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn me_returns_the_resolved_user() {
        let (app, _) = test_app();

        let response = app.oneshot(authed("/api/v1/me")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["login"], "ann");
        assert_eq!(json["permissions"], serde_json::json!(["read"]));
    }

    #[tokio::test]
    async fn invalidate_endpoint_clears_the_cached_session() {
        let (app, authority) = test_app();

        // Prime the cache, then confirm the hit path.
        app.clone().oneshot(authed("/api/v1/me")).await.unwrap();
        app.clone().oneshot(authed("/api/v1/me")).await.unwrap();
        assert_eq!(authority.calls.load(Ordering::SeqCst), 1);

        let invalidate = Request::builder()
            .uri("/internal/sessions/invalidate")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"token":"abc"}"#))
            .unwrap();
        let response = app.clone().oneshot(invalidate).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // Next resolution must go back to the authority.
        app.oneshot(authed("/api/v1/me")).await.unwrap();
        assert_eq!(authority.calls.load(Ordering::SeqCst), 2);
    }
}

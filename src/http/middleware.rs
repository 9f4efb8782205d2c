//! Route middleware: per-client rate limiting and the admin auth gate.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

use crate::error::{Result, StagedoorError};
use crate::handlers::AppState;
use crate::ratelimit::RateLimitRegistry;

/// Requests-per-minute classes assigned to route groups.
pub mod limits {
    /// Public catalog reads
    pub const PUBLIC: u32 = 100;
    /// Webhook callbacks from the payment provider
    pub const WEBHOOK: u32 = 50;
    /// Admin CRUD
    pub const ADMIN: u32 = 30;
    /// Checkout session creation
    pub const CHECKOUT: u32 = 30;
    /// Sign-in and contact form
    pub const STRICT: u32 = 5;
}

/// State for one rate-limited route group: the shared registry plus the
/// group's limit class.
#[derive(Clone)]
pub struct RouteLimit {
    registry: Arc<RateLimitRegistry>,
    requests_per_minute: u32,
}

impl RouteLimit {
    pub fn new(registry: Arc<RateLimitRegistry>, requests_per_minute: u32) -> Self {
        Self {
            registry,
            requests_per_minute,
        }
    }
}

/// Throttle a request against the caller's token bucket.
///
/// The client key is the connection's source IP, port stripped. A request
/// whose source address cannot be determined is a server error, never a
/// silent allow. Denial is 429 with a JSON body and no Retry-After header.
pub async fn rate_limit(State(limit): State<RouteLimit>, req: Request, next: Next) -> Response {
    let client = match client_key(&req) {
        Ok(client) => client,
        Err(err) => return err.into_response(),
    };

    if !limit.registry.admit(&client, limit.requests_per_minute) {
        debug!(client = %client, limit = limit.requests_per_minute, "request throttled");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "TOO_MANY_REQUESTS" })),
        )
            .into_response();
    }

    next.run(req).await
}

/// Derive the rate-limit key from the transport-level source address.
fn client_key(req: &Request) -> Result<String> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .ok_or(StagedoorError::ClientAddr)
}

/// Gate a request on admin authorization.
///
/// Accepts `Authorization: Bearer <token>` where the token is either the
/// configured admin secret or a live sign-in session.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match header_value.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token.trim(),
        None => return StagedoorError::InvalidTokenFormat.into_response(),
    };

    if !state.auth.is_admin_token(token) && !state.sessions.validate(token) {
        return StagedoorError::InvalidToken.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    use crate::ratelimit::{RegistryConfig, RateLimitRegistry};

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn limited_router(registry: Arc<RateLimitRegistry>, rpm: u32) -> Router {
        Router::new().route(
            "/",
            get(ok_handler).layer(middleware::from_fn_with_state(
                RouteLimit::new(registry, rpm),
                rate_limit,
            )),
        )
    }

    fn request_from(addr: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri("/")
            .extension(ConnectInfo(addr.parse::<SocketAddr>().unwrap()))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_under_limit_passes_through() {
        let registry = Arc::new(RateLimitRegistry::new(RegistryConfig::default()));
        let app = limited_router(registry, 3);

        for _ in 0..3 {
            let res = app.clone().oneshot(request_from("1.2.3.4:50000")).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_over_limit_returns_429() {
        let registry = Arc::new(RateLimitRegistry::new(RegistryConfig::default()));
        let app = limited_router(registry, 2);

        for _ in 0..2 {
            let res = app.clone().oneshot(request_from("1.2.3.4:50000")).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
        let res = app.clone().oneshot(request_from("1.2.3.4:50000")).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

        // Port changes do not change the client key.
        let res = app.clone().oneshot(request_from("1.2.3.4:50001")).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

        // A different source IP is unaffected.
        let res = app.oneshot(request_from("5.6.7.8:50000")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_source_address_is_an_error() {
        let registry = Arc::new(RateLimitRegistry::new(RegistryConfig::default()));
        let app = limited_router(registry.clone(), 5);

        let req = HttpRequest::builder().uri("/").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Nothing was admitted, so no bucket was created either.
        assert_eq!(registry.entry_count(), 0);
    }
}

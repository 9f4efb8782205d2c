//! Request handlers and router assembly.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::config::AuthConfig;
use crate::http::middleware::{limits, rate_limit, require_admin, RouteLimit};
use crate::http::session::SessionStore;
use crate::images::{ImageStore, MAX_IMAGE_BYTES};
use crate::mail::Mailer;
use crate::payment::PaymentProvider;
use crate::ratelimit::RateLimitRegistry;
use crate::store::Datastore;

pub mod artists;
pub mod auth;
pub mod checkout;
pub mod email;
pub mod events;
pub mod images;
pub mod products;

/// Shared state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn Datastore>,
    pub payments: Arc<dyn PaymentProvider>,
    pub mailer: Arc<dyn Mailer>,
    pub images: Arc<dyn ImageStore>,
    pub sessions: SessionStore,
    pub auth: AuthConfig,
}

/// Assemble the full route table.
///
/// Routes are grouped by rate-limit class; admin groups carry the auth gate
/// inside the rate limiter, so throttling applies before token checks.
pub fn router(state: Arc<AppState>, registry: Arc<RateLimitRegistry>) -> Router {
    let public = Router::new()
        .route("/products", get(products::list_products))
        .route("/events", get(events::list_events))
        .route("/artists", get(artists::list_artists))
        .route("/featured-artists", get(events::list_featured_artists))
        .route_layer(from_fn_with_state(
            RouteLimit::new(registry.clone(), limits::PUBLIC),
            rate_limit,
        ));

    let checkout = Router::new()
        .route("/checkout", post(checkout::create_checkout))
        .route_layer(from_fn_with_state(
            RouteLimit::new(registry.clone(), limits::CHECKOUT),
            rate_limit,
        ));

    let webhook = Router::new()
        .route("/webhook", post(checkout::handle_webhook))
        .route_layer(from_fn_with_state(
            RouteLimit::new(registry.clone(), limits::WEBHOOK),
            rate_limit,
        ));

    let strict = Router::new()
        .route("/auth/signin", post(auth::sign_in))
        .route("/email", post(email::send_booking_inquiry))
        .route_layer(from_fn_with_state(
            RouteLimit::new(registry.clone(), limits::STRICT),
            rate_limit,
        ));

    let admin = Router::new()
        .route("/product", post(products::create_product))
        .route(
            "/product/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/event", post(events::create_event))
        .route(
            "/event/{id}",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/artist", post(artists::create_artist))
        .route(
            "/artist/{id}",
            get(artists::get_artist)
                .patch(artists::update_artist)
                .delete(artists::delete_artist),
        )
        .route("/featured-artist", post(events::create_featured_artist))
        .route(
            "/featured-artist/{id}",
            axum::routing::patch(events::update_featured_artist)
                .delete(events::delete_featured_artist),
        )
        .route(
            "/image",
            // Uploads need headroom above the image size cap for the
            // multipart framing; the cap itself is enforced in the handler.
            post(images::upload_image)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
        )
        .route(
            "/image/{key}",
            get(images::get_image).delete(images::delete_image),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(
            RouteLimit::new(registry, limits::ADMIN),
            rate_limit,
        ));

    Router::new()
        .merge(public)
        .merge(checkout)
        .merge(webhook)
        .merge(strict)
        .merge(admin)
        .with_state(state)
}

//! HTTP route handlers.
//!
//! Greeting routes are never cached; `/ping` is always fresh for the
//! load balancer. Request tracing is enabled via middleware that
//! assigns a request ID to every incoming request.

pub mod greeting;
pub mod health;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_GREETING, CACHE_CONTROL_PING};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // /greeting/ itself carries the empty key; the catch-all needs a non-empty remainder
    let greeting_methods = get(greeting::read)
        .post(greeting::write)
        .fallback(greeting::unsupported);
    let greeting_routes = Router::new()
        .route(greeting::ROOT_ROUTE, greeting_methods.clone())
        .route(greeting::KEY_ROUTE, greeting_methods)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_GREETING),
        ));

    let health_routes = Router::new()
        .route("/ping", any(health::ping))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_PING),
        ));

    Router::new()
        .merge(greeting_routes)
        .merge(health_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use stockroom_store::Inventory;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::handler;

/// Verbs advertised to cross-origin callers.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the axum router with all inventory endpoints.
pub fn build_router(inventory: Inventory) -> Router {
    build_router_with_limit(inventory, DEFAULT_MAX_UPLOAD_BYTES)
}

/// Like [`build_router`], capping request bodies at `max_body_bytes`.
pub fn build_router_with_limit(inventory: Inventory, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers(Any);

    Router::new()
        .route(
            "/inventory",
            get(handler::list_handler).fallback(handler::not_found_handler),
        )
        .route(
            "/inventory/:id",
            get(handler::get_handler)
                .put(handler::update_handler)
                .delete(handler::delete_handler)
                .fallback(handler::not_found_handler),
        )
        .route(
            "/inventory/:id/photo",
            get(handler::photo_handler).fallback(handler::not_found_handler),
        )
        .route(
            "/register",
            post(handler::register_handler).fallback(handler::not_found_handler),
        )
        .route(
            "/search",
            post(handler::search_handler).fallback(handler::not_found_handler),
        )
        .fallback(handler::not_found_handler)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(preflight))
        .with_state(inventory)
}

/// Answer every `OPTIONS` request with an empty 204 before routing.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }
    let methods = ALLOWED_METHODS
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::ACCESS_CONTROL_ALLOW_METHODS, methods),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*".to_string()),
        ],
    )
        .into_response()
}

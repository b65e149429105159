//! Axum router construction.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.config.server.front_url);
    let body_limit = DefaultBodyLimit::max(ctx.config.server.max_upload_bytes);

    Router::new()
        .route("/", get(routes::health::hello))
        .route("/health", get(routes::health::health_check))
        .route(
            "/items",
            get(routes::items::list_items).post(routes::items::add_item),
        )
        .route("/items/{item_id}", get(routes::items::get_item))
        .route("/images/{filename}", get(routes::images::get_image))
        .route("/search", get(routes::search::search_items))
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// CORS restricted to the single configured front-end origin.
fn cors_layer(front_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(front_url.trim()) {
        Ok(value) if !front_url.trim().is_empty() => AllowOrigin::list([value]),
        _ => {
            tracing::warn!("Invalid front URL {front_url:?}; cross-origin requests disabled");
            AllowOrigin::list(std::iter::empty::<HeaderValue>())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

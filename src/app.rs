use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{fallback_handler, kv_handler};
use crate::routes;
use crate::state::AppState;

/// Build the request router
///
/// Only `/kv` has an active handler. Every other path, including `/r2` and
/// `/d1`, is answered by the fallback.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(routes::KV, any(kv_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

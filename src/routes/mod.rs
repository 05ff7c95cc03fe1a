//! Router assembly.

mod catalog;
mod common;

pub use catalog::catalog_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Full application: operational routes at the root, catalog CRUD under
/// `/api/v1`, request tracing, and a cap on body size. The cap is enforced by
/// the body extractors, so oversized requests get a 413 envelope.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", catalog_routes(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

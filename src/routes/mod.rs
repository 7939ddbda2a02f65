//! Router assembly.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::error::ConfigError;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/v1";

/// Full application: operational routes at the root, entities under `/api/v1`.
pub fn app(state: AppState, body_limit_bytes: usize) -> Result<Router, ConfigError> {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .nest(API_PREFIX, entity_routes(state)?)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http());
    Ok(router)
}

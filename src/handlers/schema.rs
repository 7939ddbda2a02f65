//! Read-only view of the resolved entity catalog.

use crate::response::success_one;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, response::Response};

pub async fn get_schema(State(state): State<AppState>) -> Response {
    success_one(state.model.as_ref()).into_response()
}

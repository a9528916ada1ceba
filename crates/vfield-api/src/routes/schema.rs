//! # Schema API
//!
//! Routes:
//! - GET /v1/schema: GraphQL SDL of every registered field's result type

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the schema router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/schema", get(schema_sdl))
}

async fn schema_sdl(State(state): State<AppState>) -> String {
    state.registry.to_sdl()
}

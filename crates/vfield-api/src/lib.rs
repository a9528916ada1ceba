//! # vfield-api: HTTP Front End for Validated Fields
//!
//! A thin JSON-in / JSON-out host for a [`FieldRegistry`]: the request body
//! is a field's argument object, the response is its result envelope.
//!
//! ## API Surface
//!
//! | Route                     | Module             |
//! |---------------------------|--------------------|
//! | `GET /v1/fields`          | [`routes::fields`] |
//! | `POST /v1/fields/{name}`  | [`routes::fields`] |
//! | `GET /v1/schema`          | [`routes::schema`] |
//! | `GET /health/*`           | this module        |
//!
//! ## Crate Policy
//!
//! - No validation logic in route handlers; everything delegates to
//!   `vfield-core`.
//! - All errors map to structured HTTP responses via `AppError`.
//!
//! [`FieldRegistry`]: vfield_core::FieldRegistry

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::fields::router())
        .merge(routes::schema::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the registry is built before the server binds.
async fn readiness() -> &'static str {
    "ready"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_probes_respond() {
        let registry = vfield_core::demo::registry().unwrap();
        let app = app(AppState::new(registry, AppConfig::default()));

        for uri in ["/health/liveness", "/health/readiness"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }
}

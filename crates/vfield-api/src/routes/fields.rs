//! # Field Invocation API
//!
//! Routes:
//! - GET  /v1/fields: List registered field names
//! - POST /v1/fields/{name}: Invoke a validated field; the JSON body is the
//!   argument object, the response is the result envelope

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use vfield_core::FieldError;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Build the fields router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/fields", get(list_fields))
        .route("/v1/fields/{name}", post(invoke_field))
}

async fn list_fields(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.names().map(str::to_string).collect())
}

async fn invoke_field(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let args = extract_json(body)?;
    if !args.is_object() {
        return Err(AppError::BadRequest(
            "arguments must be a JSON object".to_string(),
        ));
    }

    let field = state
        .registry
        .get(&name)
        .ok_or_else(|| FieldError::UnknownField(name.clone()))?;
    let envelope = field.resolve(&(), &args)?;
    tracing::info!(field = %name, valid = envelope.is_valid(), "field invoked");

    Ok(Json(envelope.to_value(field.valid_name(), field.result_name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use vfield_core::{demo, FieldConfig, FieldRegistry, TypeNode};

    use crate::state::AppConfig;

    fn test_app(registry: FieldRegistry<()>) -> Router {
        router().with_state(AppState::new(registry, AppConfig::default()))
    }

    fn demo_app() -> Router {
        test_app(demo::registry().unwrap())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn valid_invocation_returns_result() {
        let request = post_json(
            "/v1/fields/savePhoneNumbers",
            &json!({ "phoneNumbers": ["123-456"] }),
        );
        let response = demo_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "valid": true, "result": true }));
    }

    #[tokio::test]
    async fn invalid_invocation_is_still_ok() {
        let request = post_json("/v1/fields/savePhoneNumbers", &json!({ "phoneNumbers": ["abc"] }));
        let response = demo_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let envelope = body_json(response).await;
        assert_eq!(envelope["valid"], false);
        assert_eq!(envelope["suberrors"]["phoneNumbers"]["path"], json!([0]));
        assert!(envelope.get("result").is_none());
    }

    #[tokio::test]
    async fn unknown_field_is_not_found() {
        let request = post_json("/v1/fields/nope", &json!({}));
        let response = demo_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_body_gets_structured_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/fields/savePhoneNumbers")
            .header("content-type", "application/json")
            .body(Body::from("{oops"))
            .unwrap();
        let response = demo_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn missing_content_type_gets_structured_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/fields/savePhoneNumbers")
            .body(Body::from("{}"))
            .unwrap();
        let response = demo_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn non_object_arguments_are_rejected() {
        let request = post_json("/v1/fields/savePhoneNumbers", &json!(["123"]));
        let response = demo_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn computation_failure_hides_details() {
        let mut registry = FieldRegistry::new();
        registry
            .register(
                FieldConfig::<()>::new("explode", TypeNode::string(), |_, _| {
                    Err("secret connection string".into())
                })
                .build()
                .unwrap(),
            )
            .unwrap();

        let response = test_app(registry)
            .oneshot(post_json("/v1/fields/explode", &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("secret"));
    }

    #[tokio::test]
    async fn lists_registered_fields() {
        let request = Request::builder()
            .uri("/v1/fields")
            .body(Body::empty())
            .unwrap();
        let response = demo_app().oneshot(request).await.unwrap();
        assert_eq!(
            body_json(response).await,
            json!(["savePhoneNumbers", "updateAddressBook"])
        );
    }
}

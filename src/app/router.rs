use super::middleware::{ResponseError, with_request_logging};
use super::plugin::{RequestLogger, RequestLogging};
use crate::domain::{EventError, LifecycleEvent};
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

/// Demo routes served by the binary.
pub fn create_router(logging: Arc<RequestLogging>) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/orders/{id}", get(get_order))
        .route("/fail", get(fail));

    with_request_logging(router, logging)
}

async fn root() -> &'static str {
    "rask-request-logger"
}

async fn health() -> &'static str {
    "Healthy"
}

async fn get_order(
    Path(id): Path<u64>,
    Extension(logger): Extension<RequestLogger>,
) -> Json<serde_json::Value> {
    logger.log(&LifecycleEvent::new(["orders", "db"]).with_data(json!({ "orderId": id })));
    Json(json!({ "id": id, "status": "shipped" }))
}

async fn fail() -> Response {
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, "failed").into_response();
    response
        .extensions_mut()
        .insert(ResponseError(EventError::msg("upstream unavailable")));
    response
}

pub mod products;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": "inventory-gateway" })))
}

/// Answers with the upstream's status and the given body.
pub(crate) fn relay<B: Serialize>(status: StatusCode, body: B) -> Response {
    (status, Json(body)).into_response()
}

// src/handlers/demo.rs
//! Sample endpoints so the demo server has traffic worth measuring.
use axum::{extract::Path, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// GET /users/{id}
pub async fn get_user(Path(id): Path<u64>) -> impl IntoResponse {
    Json(json!({ "id": id, "name": format!("user-{}", id) }))
}

/// GET /orders
pub async fn list_orders() -> impl IntoResponse {
    Json(json!({ "orders": [] }))
}

/// DELETE /orders/{id}
pub async fn cancel_order(Path(_id): Path<u64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

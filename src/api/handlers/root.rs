use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> &'static str {
    "medi-ease API"
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

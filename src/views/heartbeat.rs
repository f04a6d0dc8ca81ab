use axum::Json;
use serde_json::{json, Value};

pub const MODULE: &str = module_path!();

pub async fn heartbeat() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

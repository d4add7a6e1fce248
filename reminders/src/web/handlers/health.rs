// Liveness endpoint

use axum::response::Json;
use serde_json::{json, Value};

use super::common::{ApiResponse, ApiResult};

pub async fn health_check() -> ApiResult<Value> {
    Ok(Json(ApiResponse::success(json!({
        "status": "ok",
        "service": "reminders",
        "version": env!("CARGO_PKG_VERSION"),
    }))))
}

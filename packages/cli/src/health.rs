// ABOUTME: Liveness endpoint for the Plume server
// ABOUTME: Reports service name, version and a unix timestamp

use std::time::{SystemTime, UNIX_EPOCH};

use axum::response::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(json!({
        "status": "ok",
        "service": "plume",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp,
    }))
}

// handlers/public/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service name, version and route overview
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Quill API (Rust)",
            "version": version,
            "description": "Blogging backend that keeps post images in sync with the media host",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "posts": "/api/posts[/:id] (protected)",
                "profile": "/api/profile, /api/profile/photo (protected)",
                "media": "/api/media/signature (protected)",
            }
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let store = state.store.name();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": store,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check against {} failed: {}", store, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store": store
                    }
                })),
            )
        }
    }
}

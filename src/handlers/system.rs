use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Book API",
            "version": version,
            "endpoints": {
                "book": "/book/{getAll,author,title,year,isbn,singlerating,ratings,authortitle} (public)",
                "admin": "/adminBook/{addBook,author,isbn/:isbn,changeValues,addRating} (admin bearer token)",
                "health": "/health (public)"
            }
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": chrono::Utc::now(),
                    "database": "ok"
                }
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable("database unavailable").into_response()
        }
    }
}

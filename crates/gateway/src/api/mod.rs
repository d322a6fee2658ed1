pub mod chat;

use axum::routing::{get, post};
use axum::Json;
use axum::Router;

use crate::state::AppState;

/// Build the API router: a constant info root plus the chat endpoint.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat::chat))
}

/// `GET /`: API root, constant service info.
async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "G.O.D - Guide of Dharma API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

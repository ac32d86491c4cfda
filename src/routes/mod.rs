//! HTTP route handlers backing the admin screens

pub mod clients;
pub mod invoices;
pub mod quotes;

use axum::{routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::AppState;

/// `?search=` on list screens
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(clients::router())
        .merge(quotes::router())
        .merge(invoices::router())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

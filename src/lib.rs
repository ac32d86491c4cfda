//! Back-end for the Milk & Honey BnB admin screens.
//!
//! Prices quotes, validates the client and quote forms and forwards them to
//! the hotel API, which owns all storage.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;
pub mod search;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::api::HotelApi;
use crate::config::Config;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn HotelApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(api: Arc<dyn HotelApi>, config: Config) -> Self {
        Self {
            api,
            config: Arc::new(config),
        }
    }
}

/// Full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(pricing::router())
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

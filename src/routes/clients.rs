//! Client list, detail and form handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::error::Result;
use crate::models::{Client, ClientForm};
use crate::search;
use crate::AppState;

use super::SearchQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list).post(create))
        .route("/clients/:id", get(detail).put(update).delete(remove))
}

/// Client list, optionally filtered by name or email
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Client>>> {
    let clients = state.api.list_clients().await?;
    Ok(Json(search::filter(clients, query.search.as_deref())))
}

pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<ClientForm>,
) -> Result<StatusCode> {
    form.check()?;
    state.api.create_client(&form).await?;
    info!("Client created: {}", form.email_address);
    Ok(StatusCode::CREATED)
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Client>> {
    Ok(Json(state.api.get_client(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(form): Json<ClientForm>,
) -> Result<StatusCode> {
    form.check()?;
    state.api.update_client(id, &form).await?;
    info!("Client {} updated", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode> {
    state.api.delete_client(id).await?;
    info!("Client {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

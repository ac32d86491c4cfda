//! Invoice list: quotes whose status is `invoiced`

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::{InvoiceStatus, QuoteSummary};
use crate::search;
use crate::AppState;

use super::SearchQuery;

pub fn router() -> Router<AppState> {
    Router::new().route("/invoices", get(list))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<QuoteSummary>>> {
    let invoiced: Vec<QuoteSummary> = state
        .api
        .list_quotes()
        .await?
        .into_iter()
        .filter(|q| q.invoice_status == InvoiceStatus::Invoiced)
        .collect();
    Ok(Json(search::filter(invoiced, query.search.as_deref())))
}

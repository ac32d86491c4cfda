//! Pricing endpoints.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::Result;
use crate::AppState;

use super::requests::QuoteForm;
use super::responses::QuoteTotalsResponse;
use super::services::price_form;

pub fn router() -> Router<AppState> {
    Router::new().route("/pricing/quote-totals", post(quote_totals))
}

/// Price a quote form without saving it
async fn quote_totals(
    State(state): State<AppState>,
    Json(form): Json<QuoteForm>,
) -> Result<Json<QuoteTotalsResponse>> {
    let priced = price_form(&form)?;
    Ok(Json(QuoteTotalsResponse::new(
        &priced.totals,
        &state.config.currency,
    )))
}

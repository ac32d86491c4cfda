//! Quote handlers: list, form, detail, invoicing and document attachments

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::DocumentUpload;
use crate::error::{AppError, Result};
use crate::models::{
    AttachedDocument, InvoiceStatus, QuotePayload, QuoteRecord, QuoteStatus, QuoteSummary,
};
use crate::pricing::responses::QuoteTotalsResponse;
use crate::pricing::services::{create_payload, update_payload};
use crate::pricing::{price, price_form, PricedQuote, QuoteForm, ValidationError};
use crate::search;
use crate::AppState;

use super::SearchQuery;

const DOCUMENT_FIELD: &str = "document";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list).post(create))
        .route("/quotes/:id", get(detail).put(update).delete(remove))
        .route("/quotes/:id/invoice", post(invoice))
        .route("/quotes/:id/documents", post(attach_document))
        .route("/documents", post(upload_document))
}

/// Result of a save: the status the quote now has and the totals sent
#[derive(Debug, Serialize)]
pub struct SavedQuote {
    pub status: QuoteStatus,
    pub totals: QuoteTotalsResponse,
}

/// A stored quote alongside freshly computed totals. `computed` is null when
/// the stored values cannot be re-priced.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: QuoteRecord,
    pub status: QuoteStatus,
    pub computed: Option<QuoteTotalsResponse>,
    pub totals_match: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<QuoteSummary>>> {
    let quotes = state.api.list_quotes().await?;
    Ok(Json(search::filter(quotes, query.search.as_deref())))
}

/// First save of a new quote
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<QuoteForm>,
) -> Result<(StatusCode, Json<SavedQuote>)> {
    let priced = price_form(&form)?;
    let status = QuoteStatus::Draft.issue()?;
    state.api.create_quote(&create_payload(&priced)).await?;
    info!(
        "Quote created for client {}: total={}",
        priced.draft.client_id, priced.totals.total
    );

    Ok((
        StatusCode::CREATED,
        Json(SavedQuote {
            status,
            totals: QuoteTotalsResponse::new(&priced.totals, &state.config.currency),
        }),
    ))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<QuoteView>> {
    let quote = state.api.get_quote(id).await?;

    let totals = match reprice(&quote) {
        Ok(priced) => Some(priced.totals),
        Err(e) => {
            warn!("Quote {} shown with stored totals only: {}", id, e);
            None
        }
    };

    let totals_match = totals.as_ref().is_some_and(|totals| {
        quote.subtotal == Some(totals.subtotal)
            && quote.vat == Some(totals.vat)
            && quote.total == Some(totals.total)
    });
    if let (false, Some(totals)) = (totals_match, &totals) {
        warn!(
            "Quote {} stored totals {:?}/{:?}/{:?} differ from computed {}/{}/{}",
            id, quote.subtotal, quote.vat, quote.total, totals.subtotal, totals.vat, totals.total
        );
    }

    Ok(Json(QuoteView {
        status: quote.status(),
        computed: totals
            .as_ref()
            .map(|totals| QuoteTotalsResponse::new(totals, &state.config.currency)),
        totals_match,
        quote,
    }))
}

/// Save edits to an existing quote. The stored status is left alone.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(form): Json<QuoteForm>,
) -> Result<Json<SavedQuote>> {
    let priced = price_form(&form)?;
    let current = state.api.get_quote(id).await?.status();
    state.api.update_quote(id, &update_payload(&priced)).await?;
    info!("Quote {} updated: total={}", id, priced.totals.total);

    Ok(Json(SavedQuote {
        status: current,
        totals: QuoteTotalsResponse::new(&priced.totals, &state.config.currency),
    }))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode> {
    state.api.delete_quote(id).await?;
    info!("Quote {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Quote -> Invoiced. Refused with 409 when already invoiced.
pub async fn invoice(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<QuoteStatus>> {
    let quote = state.api.get_quote(id).await?;
    let next = quote.status().invoice()?;
    state.api.set_invoice_status(id, InvoiceStatus::Invoiced).await?;
    info!("Quote {} ({}) invoiced", id, quote.quote_number);
    Ok(Json(next))
}

/// Upload a document and append its reference to the quote
pub async fn attach_document(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<Vec<AttachedDocument>>> {
    let upload = read_document(multipart).await?;
    let quote = state.api.get_quote(id).await?;

    let mut payload = match reprice(&quote) {
        Ok(priced) => update_payload(&priced),
        Err(e) => {
            warn!("Quote {} resent with stored totals: {}", id, e);
            QuotePayload::from_record(&quote)
        }
    };

    let document = state.api.upload_document(upload).await?;
    info!("Attached {} to quote {}", document.filename, id);
    payload.attached_documents.push(document);

    state.api.update_quote(id, &payload).await?;
    Ok(Json(payload.attached_documents))
}

/// Upload a document for a quote that is not saved yet
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AttachedDocument>)> {
    let upload = read_document(multipart).await?;
    let document = state.api.upload_document(upload).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

fn reprice(quote: &QuoteRecord) -> std::result::Result<PricedQuote, ValidationError> {
    price(quote.to_draft()?)
}

async fn read_document(mut multipart: Multipart) -> Result<DocumentUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Document has no filename".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        if !is_accepted_document(&filename, content_type.as_deref()) {
            return Err(AppError::BadRequest(format!(
                "Only PDF and image documents can be attached: {}",
                filename
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read document: {}", e)))?;

        return Ok(DocumentUpload {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{}'",
        DOCUMENT_FIELD
    )))
}

fn is_accepted_document(filename: &str, content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) if ct != "application/octet-stream" => {
            ct == "application/pdf" || ct.starts_with("image/")
        }
        _ => {
            let lower = filename.to_ascii_lowercase();
            [".pdf", ".png", ".jpg", ".jpeg", ".gif", ".webp"]
                .iter()
                .any(|ext| lower.ends_with(ext))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf_and_images() {
        assert!(is_accepted_document("id.pdf", Some("application/pdf")));
        assert!(is_accepted_document("scan", Some("image/jpeg")));
        assert!(is_accepted_document("Passport.PNG", None));
        assert!(is_accepted_document("id.pdf", Some("application/octet-stream")));
    }

    #[test]
    fn test_rejects_other_documents() {
        assert!(!is_accepted_document("notes.txt", Some("text/plain")));
        assert!(!is_accepted_document("archive.zip", None));
    }
}

//! Remote hotel API.
//!
//! All persistence lives behind this API; this service only validates,
//! prices and forwards. [`HotelApi`] is the seam the handlers depend on,
//! [`HttpHotelApi`] the real implementation.

pub mod client;
pub mod wire;

use async_trait::async_trait;

use crate::models::{
    AttachedDocument, Client, ClientForm, InvoiceStatus, QuotePayload, QuoteRecord, QuoteSummary,
};

pub use client::HttpHotelApi;

/// Failure talking to the hotel API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to hotel API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("hotel API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{resource} {id} not found: {message}")]
    NotFound {
        resource: &'static str,
        id: u64,
        message: String,
    },

    #[error("hotel API rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected response from hotel API: {0}")]
    Decode(#[from] serde_json::Error),
}

/// File handed to `POST /upload`
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait HotelApi: Send + Sync {
    // Clients
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError>;
    async fn get_client(&self, id: u64) -> Result<Client, ApiError>;
    async fn create_client(&self, client: &ClientForm) -> Result<(), ApiError>;
    async fn update_client(&self, id: u64, client: &ClientForm) -> Result<(), ApiError>;
    async fn delete_client(&self, id: u64) -> Result<(), ApiError>;

    // Quotes
    async fn list_quotes(&self) -> Result<Vec<QuoteSummary>, ApiError>;
    async fn get_quote(&self, id: u64) -> Result<QuoteRecord, ApiError>;
    async fn create_quote(&self, quote: &QuotePayload) -> Result<(), ApiError>;
    async fn update_quote(&self, id: u64, quote: &QuotePayload) -> Result<(), ApiError>;
    async fn set_invoice_status(&self, id: u64, status: InvoiceStatus) -> Result<(), ApiError>;
    async fn delete_quote(&self, id: u64) -> Result<(), ApiError>;

    // Documents
    async fn upload_document(&self, upload: DocumentUpload) -> Result<AttachedDocument, ApiError>;
}

//! Data models

pub mod client;
pub mod quote;

pub use client::{Client, ClientForm};
pub use quote::{
    AttachedDocument, DocumentType, InvoiceStatus, InvoiceStatusUpdate, QuotePayload, QuoteRecord,
    QuoteStatus, QuoteSummary, TransitionError,
};

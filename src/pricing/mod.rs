//! Quote pricing module.
//!
//! Turns a quote's guest counts, unit costs, service dates and discounts into
//! a subtotal, VAT and total. The hotel API stores what this module computes.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_totals, price, round_money, to_cents, VAT_RATE};
pub use models::{PricedQuote, QuoteDraft, QuoteTotals, Service, ServiceDates};
pub use requests::QuoteForm;
pub use routes::router;
pub use services::{price_form, ValidationError};

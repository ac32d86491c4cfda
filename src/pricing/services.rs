//! Quote pricing services.
//!
//! Glue between raw form input and the calculators: parse, validate, price,
//! and build the payload the hotel API stores.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{InvoiceStatus, QuotePayload};

use super::calculators::price;
use super::models::{PricedQuote, Service};
use super::requests::QuoteForm;

/// Input rejected before or during pricing. Always names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number, got {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: Decimal,
        max: Decimal,
    },

    #[error("{field} must be a date formatted YYYY-MM-DD, got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("check_out_date {check_out} must be after check_in_date {check_in}")]
    StayRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("{field} is not a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("{field} is too large to price")]
    TooLarge { field: &'static str },
}

impl ValidationError {
    /// The form field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidDate { field, .. }
            | ValidationError::InvalidEmail { field }
            | ValidationError::TooLarge { field } => field,
            ValidationError::StayRange { .. } => "check_out_date",
        }
    }
}

/// Parse and price a quote form.
pub fn price_form(form: &QuoteForm) -> Result<PricedQuote, ValidationError> {
    let draft = form.parse()?;

    for service in Service::ALL {
        let outside = draft.service_dates.outside(service, &draft.stay);
        if !outside.is_empty() {
            // billed anyway; the calendars only suggest the stay bounds
            warn!(
                "{} dates outside stay {}..{}: {:?}",
                service, draft.stay.check_in, draft.stay.check_out, outside
            );
        }
    }

    let priced = price(draft)?;
    debug!(
        "Priced quote for client {}: subtotal={} vat={} total={}",
        priced.draft.client_id, priced.totals.subtotal, priced.totals.vat, priced.totals.total
    );
    Ok(priced)
}

/// Payload for the first save of a quote. Creating moves it out of draft.
pub fn create_payload(priced: &PricedQuote) -> QuotePayload {
    QuotePayload::from_priced(priced, Some(InvoiceStatus::Quote))
}

/// Payload for editing an existing quote. Carries no invoice status so an
/// edit can never move an invoiced quote back.
pub fn update_payload(priced: &PricedQuote) -> QuotePayload {
    QuotePayload::from_priced(priced, None)
}

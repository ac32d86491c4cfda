//! Quote models as exchanged with the hotel API

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::wire;
use crate::pricing::models::{
    Discount, PricedQuote, QuoteDraft, Service, ServiceDates, StayPeriod, UnitCosts,
};
use crate::pricing::ValidationError;

/// Stored billing status of a quote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Quote,
    Invoiced,
}

/// Layout of the generated quote document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Detailed,
    Summarized,
}

/// Lifecycle of a quote.
///
/// `Draft` only exists on the new-quote form, before the first successful
/// create. `Quote -> Invoiced` is explicit and one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Quote,
    Invoiced,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("quote is already invoiced")]
    AlreadyInvoiced,
    #[error("quote has not been created yet")]
    NotCreated,
    #[error("quote has already been created")]
    AlreadyCreated,
}

impl QuoteStatus {
    /// Draft -> Quote, on the first successful create
    pub fn issue(self) -> Result<QuoteStatus, TransitionError> {
        match self {
            QuoteStatus::Draft => Ok(QuoteStatus::Quote),
            QuoteStatus::Quote | QuoteStatus::Invoiced => Err(TransitionError::AlreadyCreated),
        }
    }

    /// Quote -> Invoiced, on explicit user action
    pub fn invoice(self) -> Result<QuoteStatus, TransitionError> {
        match self {
            QuoteStatus::Quote => Ok(QuoteStatus::Invoiced),
            QuoteStatus::Draft => Err(TransitionError::NotCreated),
            QuoteStatus::Invoiced => Err(TransitionError::AlreadyInvoiced),
        }
    }
}

impl From<InvoiceStatus> for QuoteStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Quote => QuoteStatus::Quote,
            InvoiceStatus::Invoiced => QuoteStatus::Invoiced,
        }
    }
}

/// Uploaded document reference. Everything besides the filename is assigned
/// by the server and passed back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedDocument {
    pub filename: String,
    #[serde(flatten)]
    pub reference: Map<String, Value>,
}

/// Row of `GET /quotes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSummary {
    #[serde(deserialize_with = "wire::lenient_int")]
    pub quote_id: u64,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub quote_number: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub first_name: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub last_name: String,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub invoice_status: InvoiceStatus,
}

/// A single quote as returned by `GET /quotes?id=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRecord {
    #[serde(deserialize_with = "wire::lenient_int")]
    pub quote_id: u64,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub quote_number: String,
    #[serde(deserialize_with = "wire::lenient_int")]
    pub client_id: u64,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub first_name: String,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub last_name: String,
    #[serde(deserialize_with = "wire::lenient_int")]
    pub number_of_beds: u32,
    #[serde(deserialize_with = "wire::lenient_int")]
    pub number_of_guests: u32,
    pub unit_bed_cost: Decimal,
    #[serde(default)]
    pub unit_breakfast_cost: Decimal,
    #[serde(default)]
    pub unit_lunch_cost: Decimal,
    #[serde(default)]
    pub unit_dinner_cost: Decimal,
    #[serde(default)]
    pub unit_laundry_cost: Decimal,
    #[serde(default, deserialize_with = "wire::string_or_null")]
    pub guest_details: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(default, deserialize_with = "wire::date_set")]
    pub breakfast_dates: BTreeSet<NaiveDate>,
    #[serde(default, deserialize_with = "wire::date_set")]
    pub lunch_dates: BTreeSet<NaiveDate>,
    #[serde(default, deserialize_with = "wire::date_set")]
    pub dinner_dates: BTreeSet<NaiveDate>,
    #[serde(default, deserialize_with = "wire::date_set")]
    pub laundry_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default, deserialize_with = "wire::json_list")]
    pub attached_documents: Vec<AttachedDocument>,
    #[serde(default)]
    pub document_type: DocumentType,
    #[serde(default)]
    pub invoice_status: InvoiceStatus,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub vat: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub last_modified: Option<String>,
}

impl QuoteRecord {
    pub fn status(&self) -> QuoteStatus {
        self.invoice_status.into()
    }

    /// Typed pricing input for recomputing this quote's totals
    pub fn to_draft(&self) -> Result<QuoteDraft, ValidationError> {
        let mut service_dates = ServiceDates::default();
        service_dates.set(Service::Breakfast, self.breakfast_dates.clone());
        service_dates.set(Service::Lunch, self.lunch_dates.clone());
        service_dates.set(Service::Dinner, self.dinner_dates.clone());
        service_dates.set(Service::Laundry, self.laundry_dates.clone());

        let draft = QuoteDraft {
            client_id: self.client_id,
            number_of_beds: self.number_of_beds,
            number_of_guests: self.number_of_guests,
            unit_costs: UnitCosts {
                bed: self.unit_bed_cost,
                breakfast: self.unit_breakfast_cost,
                lunch: self.unit_lunch_cost,
                dinner: self.unit_dinner_cost,
                laundry: self.unit_laundry_cost,
            },
            guest_details: self.guest_details.clone(),
            stay: StayPeriod::new(self.check_in_date, self.check_out_date)?,
            service_dates,
            discount: Discount {
                percentage: self.discount_percentage,
                amount: self.discount_amount,
            },
            attached_documents: self.attached_documents.clone(),
            document_type: self.document_type,
        };
        draft.check()?;
        Ok(draft)
    }
}

/// Body of `POST /quotes` and `PUT /quotes?id=`
#[derive(Debug, Clone, Serialize)]
pub struct QuotePayload {
    pub client_id: u64,
    pub number_of_beds: u32,
    pub number_of_guests: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_bed_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_breakfast_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_lunch_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_dinner_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_laundry_cost: Decimal,
    pub guest_details: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub breakfast_dates: BTreeSet<NaiveDate>,
    pub lunch_dates: BTreeSet<NaiveDate>,
    pub dinner_dates: BTreeSet<NaiveDate>,
    pub laundry_dates: BTreeSet<NaiveDate>,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
    pub attached_documents: Vec<AttachedDocument>,
    pub document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_status: Option<InvoiceStatus>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub vat: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

impl QuotePayload {
    pub fn from_priced(priced: &PricedQuote, invoice_status: Option<InvoiceStatus>) -> Self {
        let draft = &priced.draft;
        let dates = &draft.service_dates;
        Self {
            client_id: draft.client_id,
            number_of_beds: draft.number_of_beds,
            number_of_guests: draft.number_of_guests,
            unit_bed_cost: draft.unit_costs.bed,
            unit_breakfast_cost: draft.unit_costs.breakfast,
            unit_lunch_cost: draft.unit_costs.lunch,
            unit_dinner_cost: draft.unit_costs.dinner,
            unit_laundry_cost: draft.unit_costs.laundry,
            guest_details: draft.guest_details.clone(),
            check_in_date: draft.stay.check_in,
            check_out_date: draft.stay.check_out,
            breakfast_dates: dates.breakfast.clone(),
            lunch_dates: dates.lunch.clone(),
            dinner_dates: dates.dinner.clone(),
            laundry_dates: dates.laundry.clone(),
            discount_percentage: draft.discount.percentage,
            discount_amount: draft.discount.amount,
            attached_documents: draft.attached_documents.clone(),
            document_type: draft.document_type,
            invoice_status,
            subtotal: priced.totals.subtotal,
            vat: priced.totals.vat,
            total: priced.totals.total,
        }
    }
}

impl QuotePayload {
    /// Resend a stored quote as it is, totals included. Used when the stored
    /// values no longer pass the form rules and cannot be re-priced.
    pub fn from_record(record: &QuoteRecord) -> Self {
        Self {
            client_id: record.client_id,
            number_of_beds: record.number_of_beds,
            number_of_guests: record.number_of_guests,
            unit_bed_cost: record.unit_bed_cost,
            unit_breakfast_cost: record.unit_breakfast_cost,
            unit_lunch_cost: record.unit_lunch_cost,
            unit_dinner_cost: record.unit_dinner_cost,
            unit_laundry_cost: record.unit_laundry_cost,
            guest_details: record.guest_details.clone(),
            check_in_date: record.check_in_date,
            check_out_date: record.check_out_date,
            breakfast_dates: record.breakfast_dates.clone(),
            lunch_dates: record.lunch_dates.clone(),
            dinner_dates: record.dinner_dates.clone(),
            laundry_dates: record.laundry_dates.clone(),
            discount_percentage: record.discount_percentage,
            discount_amount: record.discount_amount,
            attached_documents: record.attached_documents.clone(),
            document_type: record.document_type,
            invoice_status: None,
            subtotal: record.subtotal.unwrap_or_default(),
            vat: record.vat.unwrap_or_default(),
            total: record.total.unwrap_or_default(),
        }
    }
}

/// Body of the status-only `PUT /quotes?id=`
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceStatusUpdate {
    pub invoice_status: InvoiceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn record_json() -> Value {
        json!({
            "quote_id": "42",
            "quote_number": "Q-2024-042",
            "client_id": 7,
            "first_name": "Thandi",
            "last_name": "Mokoena",
            "number_of_beds": 2,
            "number_of_guests": "3",
            "unit_bed_cost": "500.00",
            "unit_breakfast_cost": "100.00",
            "unit_lunch_cost": 0,
            "unit_dinner_cost": "0.00",
            "unit_laundry_cost": "0.00",
            "guest_details": null,
            "check_in_date": "2024-05-01",
            "check_out_date": "2024-05-04",
            "breakfast_dates": "[\"2024-05-02\",\"2024-05-03\",\"2024-05-04\"]",
            "lunch_dates": "[]",
            "dinner_dates": "[]",
            "laundry_dates": null,
            "discount_percentage": "10.00",
            "discount_amount": "50.00",
            "attached_documents": "[{\"filename\":\"id.pdf\",\"path\":\"uploads/ab12.pdf\"}]",
            "document_type": "summarized",
            "invoice_status": "quote",
            "subtotal": "1300.00",
            "vat": "168.00",
            "total": "1288.00",
            "last_modified": "2024-04-20 09:15:00"
        })
    }

    #[test]
    fn test_lifecycle_draft_to_invoiced() {
        let status = QuoteStatus::Draft.issue().unwrap();
        assert_eq!(status, QuoteStatus::Quote);
        let status = status.invoice().unwrap();
        assert_eq!(status, QuoteStatus::Invoiced);
    }

    #[test]
    fn test_invoiced_is_terminal() {
        assert_eq!(
            QuoteStatus::Invoiced.invoice(),
            Err(TransitionError::AlreadyInvoiced)
        );
        assert_eq!(
            QuoteStatus::Invoiced.issue(),
            Err(TransitionError::AlreadyCreated)
        );
    }

    #[test]
    fn test_draft_cannot_be_invoiced() {
        assert_eq!(QuoteStatus::Draft.invoice(), Err(TransitionError::NotCreated));
    }

    #[test]
    fn test_record_from_hotel_api() {
        let record: QuoteRecord = serde_json::from_value(record_json()).unwrap();

        assert_eq!(record.quote_id, 42);
        assert_eq!(record.number_of_guests, 3);
        assert_eq!(record.guest_details, "");
        assert_eq!(record.breakfast_dates.len(), 3);
        assert!(record.laundry_dates.is_empty());
        assert_eq!(record.attached_documents[0].filename, "id.pdf");
        assert_eq!(
            record.attached_documents[0].reference["path"],
            json!("uploads/ab12.pdf")
        );
        assert_eq!(record.document_type, DocumentType::Summarized);
        assert_eq!(record.status(), QuoteStatus::Quote);
        assert_eq!(record.total, Some(dec!(1288)));
    }

    #[test]
    fn test_record_reprices_to_stored_totals() {
        let record: QuoteRecord = serde_json::from_value(record_json()).unwrap();
        let totals = crate::pricing::compute_totals(&record.to_draft().unwrap()).unwrap();
        assert_eq!(Some(totals.subtotal), record.subtotal);
        assert_eq!(Some(totals.vat), record.vat);
        assert_eq!(Some(totals.total), record.total);
    }

    #[test]
    fn test_summary_defaults_status() {
        let summary: QuoteSummary = serde_json::from_value(json!({
            "quote_id": 1,
            "quote_number": "Q-1",
            "first_name": "Ana",
            "last_name": null
        }))
        .unwrap();
        assert_eq!(summary.invoice_status, InvoiceStatus::Quote);
        assert_eq!(summary.last_name, "");
        assert_eq!(summary.total, None);
    }

    #[test]
    fn test_payload_serializes_wire_shape() {
        let record: QuoteRecord = serde_json::from_value(record_json()).unwrap();
        let priced = crate::pricing::price(record.to_draft().unwrap()).unwrap();
        let payload = serde_json::to_value(QuotePayload::from_priced(&priced, None)).unwrap();

        assert_eq!(payload["unit_bed_cost"], json!("500.00"));
        assert_eq!(
            payload["breakfast_dates"],
            json!(["2024-05-02", "2024-05-03", "2024-05-04"])
        );
        assert_eq!(payload["document_type"], json!("summarized"));
        assert_eq!(payload["attached_documents"][0]["path"], json!("uploads/ab12.pdf"));
        assert_eq!(payload["total"], json!("1288.00"));
        assert!(payload.get("invoice_status").is_none());
    }
}

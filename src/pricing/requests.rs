//! Request DTOs for quote forms and pricing endpoints.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{AttachedDocument, DocumentType};

use super::models::{Discount, QuoteDraft, Service, ServiceDates, StayPeriod, UnitCosts};
use super::services::ValidationError;

/// A quote form as submitted by the new/edit screens.
///
/// Numeric fields are accepted as JSON numbers or as the strings a text input
/// produces; nothing is parsed until [`QuoteForm::parse`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub client_id: Option<Value>,
    #[serde(default)]
    pub number_of_beds: Option<Value>,
    #[serde(default)]
    pub number_of_guests: Option<Value>,
    #[serde(default)]
    pub unit_bed_cost: Option<Value>,
    #[serde(default)]
    pub unit_breakfast_cost: Option<Value>,
    #[serde(default)]
    pub unit_lunch_cost: Option<Value>,
    #[serde(default)]
    pub unit_dinner_cost: Option<Value>,
    #[serde(default)]
    pub unit_laundry_cost: Option<Value>,
    #[serde(default)]
    pub guest_details: Option<String>,
    #[serde(default)]
    pub check_in_date: Option<String>,
    #[serde(default)]
    pub check_out_date: Option<String>,
    #[serde(default)]
    pub breakfast_dates: Vec<String>,
    #[serde(default)]
    pub lunch_dates: Vec<String>,
    #[serde(default)]
    pub dinner_dates: Vec<String>,
    #[serde(default)]
    pub laundry_dates: Vec<String>,
    #[serde(default)]
    pub discount_percentage: Option<Value>,
    #[serde(default)]
    pub discount_amount: Option<Value>,
    #[serde(default)]
    pub attached_documents: Vec<AttachedDocument>,
    #[serde(default)]
    pub document_type: Option<DocumentType>,
}

impl QuoteForm {
    /// Parse into a typed draft. Required fields are checked first, in the
    /// order the form lists them.
    pub fn parse(&self) -> Result<QuoteDraft, ValidationError> {
        let client_id = required_int::<u64>("client_id", &self.client_id)?;
        let number_of_beds = required_int::<u32>("number_of_beds", &self.number_of_beds)?;
        let number_of_guests = required_int::<u32>("number_of_guests", &self.number_of_guests)?;
        let bed = required_decimal("unit_bed_cost", &self.unit_bed_cost)?;
        let check_in = required_date("check_in_date", &self.check_in_date)?;
        let check_out = required_date("check_out_date", &self.check_out_date)?;
        let stay = StayPeriod::new(check_in, check_out)?;

        let unit_costs = UnitCosts {
            bed,
            breakfast: optional_decimal("unit_breakfast_cost", &self.unit_breakfast_cost)?,
            lunch: optional_decimal("unit_lunch_cost", &self.unit_lunch_cost)?,
            dinner: optional_decimal("unit_dinner_cost", &self.unit_dinner_cost)?,
            laundry: optional_decimal("unit_laundry_cost", &self.unit_laundry_cost)?,
        };

        let mut service_dates = ServiceDates::default();
        for service in Service::ALL {
            service_dates.set(service, date_set(service, self.dates_for(service))?);
        }

        let discount = Discount {
            percentage: optional_decimal("discount_percentage", &self.discount_percentage)?,
            amount: optional_decimal("discount_amount", &self.discount_amount)?,
        };

        let draft = QuoteDraft {
            client_id,
            number_of_beds,
            number_of_guests,
            unit_costs,
            guest_details: self.guest_details.clone().unwrap_or_default(),
            stay,
            service_dates,
            discount,
            attached_documents: self.attached_documents.clone(),
            document_type: self.document_type.unwrap_or_default(),
        };
        draft.check()?;
        Ok(draft)
    }

    fn dates_for(&self, service: Service) -> &[String] {
        match service {
            Service::Breakfast => &self.breakfast_dates,
            Service::Lunch => &self.lunch_dates,
            Service::Dinner => &self.dinner_dates,
            Service::Laundry => &self.laundry_dates,
        }
    }
}

/// Raw text of a form value. `None` when the field is absent or null.
fn text(field: &'static str, value: &Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ValidationError::NotNumeric {
            field,
            value: other.to_string(),
        }),
    }
}

fn required_text(field: &'static str, value: &Option<Value>) -> Result<String, ValidationError> {
    match text(field, value)? {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::Missing { field }),
    }
}

fn required_int<T>(field: &'static str, value: &Option<Value>) -> Result<T, ValidationError>
where
    T: TryFrom<i64>,
{
    let raw = required_text(field, value)?;
    let parsed: i64 = raw.parse().map_err(|_| ValidationError::NotNumeric {
        field,
        value: raw.clone(),
    })?;
    if parsed < 0 {
        return Err(ValidationError::Negative { field });
    }
    T::try_from(parsed).map_err(|_| ValidationError::NotNumeric { field, value: raw })
}

fn parse_decimal(field: &'static str, raw: String) -> Result<Decimal, ValidationError> {
    let parsed: Decimal = raw
        .parse()
        .map_err(|_| ValidationError::NotNumeric { field, value: raw })?;
    if parsed < Decimal::ZERO {
        return Err(ValidationError::Negative { field });
    }
    Ok(parsed)
}

fn required_decimal(field: &'static str, value: &Option<Value>) -> Result<Decimal, ValidationError> {
    parse_decimal(field, required_text(field, value)?)
}

/// Absent means zero, which is what the forms prefill. A field that is
/// present but blank is an error, not a silent zero.
fn optional_decimal(field: &'static str, value: &Option<Value>) -> Result<Decimal, ValidationError> {
    match text(field, value)? {
        None => Ok(Decimal::ZERO),
        Some(raw) => parse_decimal(field, raw),
    }
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn required_date(field: &'static str, value: &Option<String>) -> Result<NaiveDate, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_date(field, raw),
        _ => Err(ValidationError::Missing { field }),
    }
}

fn date_set(service: Service, raw: &[String]) -> Result<BTreeSet<NaiveDate>, ValidationError> {
    raw.iter()
        .map(|d| parse_date(service.dates_field(), d))
        .collect()
}

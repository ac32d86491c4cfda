//! Pricing inputs and outputs.
//!
//! A `QuoteDraft` is the typed, already-parsed form of a quote. It is passed
//! by reference into the calculators and handed back inside a `PricedQuote`;
//! nothing in the pricing path mutates it.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttachedDocument, DocumentType};
use crate::pricing::services::ValidationError;

/// Billable services that are charged per selected date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Breakfast,
    Lunch,
    Dinner,
    Laundry,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Breakfast,
        Service::Lunch,
        Service::Dinner,
        Service::Laundry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Service::Breakfast => "breakfast",
            Service::Lunch => "lunch",
            Service::Dinner => "dinner",
            Service::Laundry => "laundry",
        }
    }

    /// Name of the wire field holding this service's date list
    pub fn dates_field(self) -> &'static str {
        match self {
            Service::Breakfast => "breakfast_dates",
            Service::Lunch => "lunch_dates",
            Service::Dinner => "dinner_dates",
            Service::Laundry => "laundry_dates",
        }
    }

    /// Name of the wire field holding this service's unit cost
    pub fn cost_field(self) -> &'static str {
        match self {
            Service::Breakfast => "unit_breakfast_cost",
            Service::Lunch => "unit_lunch_cost",
            Service::Dinner => "unit_dinner_cost",
            Service::Laundry => "unit_laundry_cost",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected dates per service. The cardinality of each set is the number of
/// billable occurrences of that service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceDates {
    pub breakfast: BTreeSet<NaiveDate>,
    pub lunch: BTreeSet<NaiveDate>,
    pub dinner: BTreeSet<NaiveDate>,
    pub laundry: BTreeSet<NaiveDate>,
}

impl ServiceDates {
    pub fn get(&self, service: Service) -> &BTreeSet<NaiveDate> {
        match service {
            Service::Breakfast => &self.breakfast,
            Service::Lunch => &self.lunch,
            Service::Dinner => &self.dinner,
            Service::Laundry => &self.laundry,
        }
    }

    fn get_mut(&mut self, service: Service) -> &mut BTreeSet<NaiveDate> {
        match service {
            Service::Breakfast => &mut self.breakfast,
            Service::Lunch => &mut self.lunch,
            Service::Dinner => &mut self.dinner,
            Service::Laundry => &mut self.laundry,
        }
    }

    pub fn set(&mut self, service: Service, dates: BTreeSet<NaiveDate>) {
        *self.get_mut(service) = dates;
    }

    /// Select the date if it is not selected yet, otherwise deselect it.
    /// Returns whether the date is selected afterwards.
    pub fn toggle(&mut self, service: Service, date: NaiveDate) -> bool {
        let dates = self.get_mut(service);
        if dates.remove(&date) {
            false
        } else {
            dates.insert(date);
            true
        }
    }

    pub fn count(&self, service: Service) -> usize {
        self.get(service).len()
    }

    /// Dates selected for `service` that fall outside the stay
    pub fn outside(&self, service: Service, stay: &StayPeriod) -> Vec<NaiveDate> {
        self.get(service)
            .iter()
            .filter(|d| !stay.contains(**d))
            .copied()
            .collect()
    }
}

/// Check-in / check-out range. Check-out is strictly after check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayPeriod {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayPeriod {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        let stay = Self { check_in, check_out };
        stay.check()?;
        Ok(stay)
    }

    fn check(&self) -> Result<(), ValidationError> {
        if self.check_out <= self.check_in {
            return Err(ValidationError::StayRange {
                check_in: self.check_in,
                check_out: self.check_out,
            });
        }
        Ok(())
    }

    /// Inclusive on both ends, matching the calendar bounds on the forms
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.check_in && date <= self.check_out
    }
}

/// Per-unit costs in the quote currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitCosts {
    #[serde(with = "rust_decimal::serde::str")]
    pub bed: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub breakfast: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub lunch: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub dinner: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub laundry: Decimal,
}

impl UnitCosts {
    pub fn for_service(&self, service: Service) -> Decimal {
        match service {
            Service::Breakfast => self.breakfast,
            Service::Lunch => self.lunch,
            Service::Dinner => self.dinner,
            Service::Laundry => self.laundry,
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        non_negative("unit_bed_cost", self.bed)?;
        for service in Service::ALL {
            non_negative(service.cost_field(), self.for_service(service))?;
        }
        Ok(())
    }
}

/// Percentage and flat discount. Both apply, additively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discount {
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl Discount {
    fn check(&self) -> Result<(), ValidationError> {
        if self.percentage < Decimal::ZERO || self.percentage > Decimal::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                field: "discount_percentage",
                min: Decimal::ZERO,
                max: Decimal::ONE_HUNDRED,
            });
        }
        non_negative("discount_amount", self.amount)
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

/// A quote as entered on the new/edit form, parsed and typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteDraft {
    pub client_id: u64,
    pub number_of_beds: u32,
    pub number_of_guests: u32,
    pub unit_costs: UnitCosts,
    pub guest_details: String,
    pub stay: StayPeriod,
    pub service_dates: ServiceDates,
    pub discount: Discount,
    pub attached_documents: Vec<AttachedDocument>,
    pub document_type: DocumentType,
}

impl QuoteDraft {
    /// Invariants the typed fields cannot express on their own
    pub fn check(&self) -> Result<(), ValidationError> {
        self.stay.check()?;
        self.unit_costs.check()?;
        self.discount.check()
    }
}

/// Charge for one per-date service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCharge {
    pub service: Service,
    pub dates: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Result of pricing a quote draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTotals {
    pub bed_charge: Decimal,
    pub services: Vec<ServiceCharge>,
    pub subtotal: Decimal,
    /// Effective discount, already capped at the subtotal
    pub discount: Decimal,
    pub taxable: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

/// A draft together with the totals computed from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedQuote {
    pub draft: QuoteDraft,
    pub totals: QuoteTotals,
}

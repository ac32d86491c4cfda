//! Response DTOs for pricing.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::VAT_RATE;
use super::models::{QuoteTotals, Service};

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }
}

/// One service line of the breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ServiceLineResponse {
    pub service: Service,
    pub dates: usize,
    pub unit_cost: MoneyResponse,
    pub amount: MoneyResponse,
}

/// Response for quote totals
#[derive(Debug, Clone, Serialize)]
pub struct QuoteTotalsResponse {
    pub bed_charge: MoneyResponse,
    pub services: Vec<ServiceLineResponse>,
    pub subtotal: MoneyResponse,
    pub discount: MoneyResponse,
    pub taxable: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub vat_rate: Decimal,
    pub vat: MoneyResponse,
    pub total: MoneyResponse,
}

impl QuoteTotalsResponse {
    pub fn new(totals: &QuoteTotals, currency: &str) -> Self {
        Self {
            bed_charge: MoneyResponse::new(totals.bed_charge, currency),
            services: totals
                .services
                .iter()
                .map(|line| ServiceLineResponse {
                    service: line.service,
                    dates: line.dates,
                    unit_cost: MoneyResponse::new(line.unit_cost, currency),
                    amount: MoneyResponse::new(line.amount, currency),
                })
                .collect(),
            subtotal: MoneyResponse::new(totals.subtotal, currency),
            discount: MoneyResponse::new(totals.discount, currency),
            taxable: MoneyResponse::new(totals.taxable, currency),
            vat_rate: VAT_RATE,
            vat: MoneyResponse::new(totals.vat, currency),
            total: MoneyResponse::new(totals.total, currency),
        }
    }
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

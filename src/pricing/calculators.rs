//! Core quote pricing functions.
//!
//! Pure functions for pricing math - no network access. The same formula is
//! expected to run on the hotel API side, so any change here must be mirrored
//! there or stored totals will drift from displayed ones.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::pricing::models::{PricedQuote, QuoteDraft, Service, ServiceCharge, QuoteTotals};
use crate::pricing::services::ValidationError;

/// Fixed VAT rate applied to the post-discount subtotal.
pub const VAT_RATE: Decimal = dec!(0.15);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use bnb_admin::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round to cents and fix the scale at two places, so amounts serialize as
/// `1288.00` rather than `1288`.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut cents = round_money(amount, 2);
    cents.rescale(2);
    cents
}

/// Compute subtotal, discount, VAT and total for a quote draft.
///
/// 1. beds x unit bed cost (flat for the stay, not per night)
/// 2. per service: number of selected dates x unit cost
/// 3. subtotal = sum of the above
/// 4. discount = subtotal x (pct / 100) + flat amount, capped at subtotal
/// 5. vat = 15% of (subtotal - discount), rounded to cents
///
/// Fails when the draft carries values a form would have rejected
/// (negative costs, a percentage outside 0..=100, an inverted stay), or
/// amounts too large to represent.
pub fn compute_totals(draft: &QuoteDraft) -> Result<QuoteTotals, ValidationError> {
    draft.check()?;

    let bed_charge = Decimal::from(draft.number_of_beds)
        .checked_mul(draft.unit_costs.bed)
        .ok_or(ValidationError::TooLarge {
            field: "unit_bed_cost",
        })?;

    let services = Service::ALL
        .iter()
        .map(|&service| -> Result<ServiceCharge, ValidationError> {
            let dates = draft.service_dates.count(service);
            let unit_cost = draft.unit_costs.for_service(service);
            let amount = Decimal::from(dates)
                .checked_mul(unit_cost)
                .ok_or(ValidationError::TooLarge {
                    field: service.cost_field(),
                })?;
            Ok(ServiceCharge {
                service,
                dates,
                unit_cost,
                amount,
            })
        })
        .collect::<Result<Vec<ServiceCharge>, ValidationError>>()?;

    let subtotal = services
        .iter()
        .try_fold(bed_charge, |sum, line| sum.checked_add(line.amount))
        .ok_or(ValidationError::TooLarge { field: "subtotal" })?;

    // Both discount mechanisms apply together, never more than the subtotal.
    // A sum past Decimal::MAX is past the subtotal too.
    let discount = subtotal
        .checked_mul(draft.discount.percentage / Decimal::ONE_HUNDRED)
        .and_then(|pct| pct.checked_add(draft.discount.amount))
        .map_or(subtotal, |raw| raw.min(subtotal));

    let taxable = to_cents((subtotal - discount).max(Decimal::ZERO));
    let vat = to_cents(
        taxable
            .checked_mul(VAT_RATE)
            .ok_or(ValidationError::TooLarge { field: "vat" })?,
    );
    let total = taxable
        .checked_add(vat)
        .ok_or(ValidationError::TooLarge { field: "total" })?;

    Ok(QuoteTotals {
        bed_charge: to_cents(bed_charge),
        services,
        subtotal: to_cents(subtotal),
        discount: to_cents(discount),
        taxable,
        vat,
        total,
    })
}

/// Price a draft, handing the draft back together with its totals.
pub fn price(draft: QuoteDraft) -> Result<PricedQuote, ValidationError> {
    let totals = compute_totals(&draft)?;
    Ok(PricedQuote { draft, totals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{Discount, StayPeriod, UnitCosts};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(beds: u32, bed_cost: Decimal) -> QuoteDraft {
        QuoteDraft {
            client_id: 1,
            number_of_beds: beds,
            number_of_guests: beds,
            unit_costs: UnitCosts {
                bed: bed_cost,
                ..UnitCosts::default()
            },
            guest_details: String::new(),
            stay: StayPeriod::new(date("2024-05-01"), date("2024-05-04")).unwrap(),
            service_dates: Default::default(),
            discount: Discount::default(),
            attached_documents: vec![],
            document_type: Default::default(),
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.2));
        assert_eq!(round_money(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(999999.995), 2), dec!(1000000.00));
    }

    // ==================== compute_totals tests ====================

    #[test]
    fn test_to_cents_fixes_scale() {
        assert_eq!(to_cents(dec!(1288)).to_string(), "1288.00");
        assert_eq!(to_cents(dec!(14.5485)).to_string(), "14.55");
    }

    #[test]
    fn test_beds_breakfast_and_both_discounts() {
        let mut quote = draft(2, dec!(500));
        quote.unit_costs.breakfast = dec!(100);
        for day in ["2024-05-01", "2024-05-02", "2024-05-03"] {
            quote.service_dates.toggle(Service::Breakfast, date(day));
        }
        quote.discount = Discount {
            percentage: dec!(10),
            amount: dec!(50),
        };

        let totals = compute_totals(&quote).unwrap();

        assert_eq!(totals.bed_charge, dec!(1000));
        assert_eq!(totals.subtotal, dec!(1300));
        assert_eq!(totals.discount, dec!(180));
        assert_eq!(totals.taxable, dec!(1120));
        assert_eq!(totals.vat, dec!(168));
        assert_eq!(totals.total, dec!(1288));
    }

    #[test]
    fn test_discount_larger_than_subtotal_clamps_to_zero() {
        let mut quote = draft(1, dec!(200));
        quote.discount = Discount {
            percentage: dec!(100),
            amount: dec!(50),
        };

        let totals = compute_totals(&quote).unwrap();

        assert_eq!(totals.subtotal, dec!(200));
        assert_eq!(totals.discount, dec!(200));
        assert_eq!(totals.taxable, dec!(0));
        assert_eq!(totals.vat, dec!(0));
        assert_eq!(totals.total, dec!(0));
    }

    #[test]
    fn test_nothing_billable_is_all_zero() {
        let mut quote = draft(0, dec!(450));
        quote.unit_costs.breakfast = dec!(90);
        quote.unit_costs.lunch = dec!(120);
        quote.unit_costs.dinner = dec!(180);
        quote.unit_costs.laundry = dec!(60);

        let totals = compute_totals(&quote).unwrap();

        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.vat, dec!(0));
        assert_eq!(totals.total, dec!(0));
        assert!(totals.services.iter().all(|s| s.amount.is_zero()));
    }

    #[test]
    fn test_bed_cost_is_not_multiplied_by_nights() {
        // three-night stay, still a single charge per bed
        let totals = compute_totals(&draft(3, dec!(250))).unwrap();
        assert_eq!(totals.bed_charge, dec!(750));
        assert_eq!(totals.subtotal, dec!(750));
    }

    #[test]
    fn test_every_service_is_billed_by_date_count() {
        let mut quote = draft(0, dec!(0));
        quote.unit_costs = UnitCosts {
            bed: dec!(0),
            breakfast: dec!(10),
            lunch: dec!(20),
            dinner: dec!(30),
            laundry: dec!(40),
        };
        quote.service_dates.toggle(Service::Breakfast, date("2024-05-01"));
        quote.service_dates.toggle(Service::Lunch, date("2024-05-01"));
        quote.service_dates.toggle(Service::Lunch, date("2024-05-02"));
        quote.service_dates.toggle(Service::Dinner, date("2024-05-02"));
        quote.service_dates.toggle(Service::Laundry, date("2024-05-03"));
        // dates outside the stay are still billed
        quote.service_dates.toggle(Service::Laundry, date("2024-06-01"));

        let totals = compute_totals(&quote).unwrap();

        // 10 + 2*20 + 30 + 2*40
        assert_eq!(totals.subtotal, dec!(160));
        assert_eq!(totals.vat, dec!(24));
        assert_eq!(totals.total, dec!(184));
    }

    #[test]
    fn test_vat_is_rounded_to_cents() {
        let mut quote = draft(1, dec!(99.99));
        quote.discount.percentage = dec!(3);

        let totals = compute_totals(&quote).unwrap();

        // 99.99 - 2.9997 = 96.9903 -> 96.99; 96.99 * 0.15 = 14.5485 -> 14.55
        assert_eq!(totals.taxable, dec!(96.99));
        assert_eq!(totals.vat, dec!(14.55));
        assert_eq!(totals.total, dec!(111.54));
        assert_eq!(totals.vat, round_money(totals.taxable * VAT_RATE, 2));
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let mut quote = draft(4, dec!(375.50));
        quote.unit_costs.dinner = dec!(145);
        quote.service_dates.toggle(Service::Dinner, date("2024-05-02"));
        quote.discount = Discount {
            percentage: dec!(12.5),
            amount: dec!(20),
        };

        let first = compute_totals(&quote).unwrap();
        let second = compute_totals(&quote).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_cost_is_rejected() {
        let quote = draft(1, dec!(-1));
        let err = compute_totals(&quote).unwrap_err();
        assert_eq!(err.field(), "unit_bed_cost");
    }

    #[test]
    fn test_percentage_over_hundred_is_rejected() {
        let mut quote = draft(1, dec!(100));
        quote.discount.percentage = dec!(100.5);
        let err = compute_totals(&quote).unwrap_err();
        assert_eq!(err.field(), "discount_percentage");
    }

    #[test]
    fn test_price_returns_draft_untouched() {
        let quote = draft(2, dec!(500));
        let priced = price(quote.clone()).unwrap();
        assert_eq!(priced.draft, quote);
        assert_eq!(priced.totals.total, dec!(1150));
    }

    #[test]
    fn test_full_discount_on_huge_bed_cost() {
        let mut quote = draft(1, dec!(1000000000000000000000000000));
        quote.discount.percentage = dec!(100);

        let totals = compute_totals(&quote).unwrap();

        assert_eq!(totals.discount, dec!(1000000000000000000000000000));
        assert_eq!(totals.taxable, dec!(0));
        assert_eq!(totals.total, dec!(0));
    }

    #[test]
    fn test_unrepresentable_amounts_are_rejected() {
        let err = compute_totals(&draft(2, Decimal::MAX)).unwrap_err();
        assert_eq!(err, ValidationError::TooLarge { field: "unit_bed_cost" });

        let mut quote = draft(1, Decimal::MAX);
        quote.unit_costs.laundry = Decimal::MAX;
        quote.service_dates.toggle(Service::Laundry, date("2024-05-02"));
        let err = compute_totals(&quote).unwrap_err();
        assert_eq!(err.field(), "subtotal");

        // taxable fits, taxable plus VAT does not
        let err = compute_totals(&draft(1, Decimal::MAX)).unwrap_err();
        assert_eq!(err.field(), "total");
    }

    #[test]
    fn test_huge_flat_discount_caps_at_subtotal() {
        let mut quote = draft(1, Decimal::MAX);
        quote.discount = Discount {
            percentage: dec!(50),
            amount: Decimal::MAX,
        };

        let totals = compute_totals(&quote).unwrap();

        assert_eq!(totals.discount, totals.subtotal);
        assert_eq!(totals.total, dec!(0));
    }

    #[test]
    fn test_totals_hold_across_input_grid() {
        let beds = [0u32, 1, 3, 250];
        let costs = [
            dec!(0),
            dec!(0.01),
            dec!(99.99),
            dec!(1250.5),
            dec!(1000000000000000000000000),
            Decimal::MAX / dec!(3),
            Decimal::MAX,
        ];
        let percentages = [dec!(0), dec!(3), dec!(12.5), dec!(33.33), dec!(100)];
        let flats = [dec!(0), dec!(0.01), dec!(50), dec!(100000), Decimal::MAX];

        let mut priced = 0;
        for &bed_count in &beds {
            for &cost in &costs {
                for &percentage in &percentages {
                    for &amount in &flats {
                        let mut quote = draft(bed_count, cost);
                        quote.unit_costs.breakfast = cost;
                        quote.service_dates.toggle(Service::Breakfast, date("2024-05-02"));
                        quote.service_dates.toggle(Service::Breakfast, date("2024-05-03"));
                        quote.discount = Discount { percentage, amount };

                        let totals = match compute_totals(&quote) {
                            Ok(totals) => totals,
                            Err(ValidationError::TooLarge { .. }) => continue,
                            Err(other) => panic!("unexpected error: {other}"),
                        };
                        priced += 1;

                        assert!(totals.taxable >= Decimal::ZERO);
                        assert!(totals.total >= Decimal::ZERO);
                        assert!(totals.discount <= totals.subtotal);
                        assert_eq!(totals.vat, round_money(totals.taxable * VAT_RATE, 2));
                        assert_eq!(totals.total, totals.taxable + totals.vat);
                    }
                }
            }
        }
        assert!(priced >= 400, "only {priced} combinations priced");
    }
}

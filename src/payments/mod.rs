//! Payment pipeline: screen payment records and accumulate currency totals.
//!
//! Unlike the transfer pipeline, validation here is interleaved with
//! accumulation. Each applicant element resolves a currency bucket, then
//! every payment in its list is screened and, if it passes, contributes
//! `amount * (incomeshare / base)` to that bucket in one pass. A failing
//! payment is skipped alone; a malformed applicant is skipped whole; the
//! caller never sees an error.
//!
//! The active flag follows an explicit known-false rule rather than any
//! notion of truthiness: a value is inactive iff it is boolean `false`,
//! one of the literal strings in `INACTIVE_LITERALS`, or a number equal
//! to zero. Everything else is active, including null, empty containers,
//! `"FALSE"` in caps, and negative numbers.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::coerce;
use crate::error::SkipReason;

/// Bucket key used when a currency is missing, null, or blank.
pub const DEFAULT_CURRENCY: &str = "GEL";

/// String literals treated as inactive. Matching is exact: no trimming,
/// no case folding.
const INACTIVE_LITERALS: [&str; 3] = ["false", "False", "0"];

/// Per-currency running totals, ordered by currency code.
pub type CurrencyTotals = BTreeMap<String, f64>;

// =============================================================================
// Report Types
// =============================================================================

/// Outcome of a payment calculation pass: totals plus skip bookkeeping.
#[derive(Debug, Default)]
pub struct PaymentReport {
    /// Accumulated totals keyed by normalized currency.
    pub totals: CurrencyTotals,
    /// Records skipped along the way, with their input positions.
    pub skipped: Vec<SkippedPayment>,
}

impl PaymentReport {
    /// Summary counts for diagnostics.
    pub fn summary(&self) -> String {
        format!(
            "Calculated: {} currencies, {} records skipped",
            self.totals.len(),
            self.skipped.len()
        )
    }
}

/// A payment (or whole applicant) skipped during calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPayment {
    /// Index of the applicant element in the input sequence.
    pub applicant: usize,
    /// Index of the payment within the applicant, for payment-level skips.
    pub payment: Option<usize>,
    /// Why the record was skipped.
    pub reason: SkipReason,
}

// =============================================================================
// Calculation
// =============================================================================

/// Calculate per-currency payment totals from raw applicant records.
///
/// Never fails: a non-array input yields an empty mapping, malformed
/// elements are excluded, and a bucket appears only once a payment
/// actually contributes to it (a 0.0 contribution still counts).
pub fn calculate_payments(raw: &Value) -> CurrencyTotals {
    calculate_payments_with_report(raw).totals
}

/// Calculate totals and keep the skip bookkeeping.
pub fn calculate_payments_with_report(raw: &Value) -> PaymentReport {
    let mut report = PaymentReport::default();

    let elements = match raw.as_array() {
        Some(elements) => elements,
        None => return report,
    };

    for (index, element) in elements.iter().enumerate() {
        let record = match element.as_object() {
            Some(record) => record,
            None => {
                debug!(applicant = index, "skipped applicant: not an object");
                report.skipped.push(SkippedPayment {
                    applicant: index,
                    payment: None,
                    reason: SkipReason::NotAnObject,
                });
                continue;
            }
        };

        let currency = resolve_currency(record.get("currency"));

        let payments = match record.get("payments") {
            None => {
                report.skipped.push(SkippedPayment {
                    applicant: index,
                    payment: None,
                    reason: SkipReason::MissingField("payments"),
                });
                continue;
            }
            Some(value) => match value.as_array() {
                Some(payments) => payments,
                None => {
                    debug!(applicant = index, "skipped applicant: payments is not a list");
                    report.skipped.push(SkippedPayment {
                        applicant: index,
                        payment: None,
                        reason: SkipReason::InvalidField("payments"),
                    });
                    continue;
                }
            },
        };

        for (position, raw_payment) in payments.iter().enumerate() {
            match screen_payment(raw_payment) {
                Ok(terms) => {
                    *report.totals.entry(currency.clone()).or_insert(0.0) += terms.contribution();
                }
                Err(reason) => {
                    debug!(applicant = index, payment = position, %reason, "skipped payment");
                    report.skipped.push(SkippedPayment {
                        applicant: index,
                        payment: Some(position),
                        reason,
                    });
                }
            }
        }
    }

    report
}

// =============================================================================
// Screening
// =============================================================================

/// Validated numeric fields of one active payment.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PaymentTerms {
    incomeshare: f64,
    base: f64,
    amount: f64,
}

impl PaymentTerms {
    /// Ratio-weighted contribution. The ratio is formed first, then
    /// scaled; this association is part of the contract.
    fn contribution(&self) -> f64 {
        self.amount * (self.incomeshare / self.base)
    }
}

/// Screen one raw payment element.
///
/// Field rules:
/// - `active`: absent defaults to active; otherwise the known-false test
/// - `incomeshare`: absent, null, or exactly `""` defaults to 1.0;
///   anything else must coerce (a whitespace-only string does not)
/// - `base`: mandatory, must coerce, must not be zero
/// - `amount`: absent defaults to 0.0; anything else must coerce
///   (null and `""` do not)
fn screen_payment(raw: &Value) -> Result<PaymentTerms, SkipReason> {
    let payment = raw.as_object().ok_or(SkipReason::NotAnObject)?;

    if payment.get("active").is_some_and(is_inactive) {
        return Err(SkipReason::Inactive);
    }

    let incomeshare = match payment.get("incomeshare") {
        None | Some(Value::Null) => 1.0,
        Some(Value::String(s)) if s.is_empty() => 1.0,
        Some(value) => coerce::to_f64(value).ok_or(SkipReason::InvalidField("incomeshare"))?,
    };

    let base = payment
        .get("base")
        .ok_or(SkipReason::MissingField("base"))
        .and_then(|value| coerce::to_f64(value).ok_or(SkipReason::InvalidField("base")))?;
    if base == 0.0 {
        return Err(SkipReason::ZeroBase);
    }

    let amount = match payment.get("amount") {
        None => 0.0,
        Some(value) => coerce::to_f64(value).ok_or(SkipReason::InvalidField("amount"))?,
    };

    Ok(PaymentTerms {
        incomeshare,
        base,
        amount,
    })
}

/// Exact known-false test for the active flag.
fn is_inactive(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::String(s) => INACTIVE_LITERALS.contains(&s.as_str()),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Normalize the currency field into a bucket key.
///
/// Missing, null, and blank-after-trim all bucket to
/// [`DEFAULT_CURRENCY`]; anything else is trimmed and uppercased.
/// Non-string values go through their JSON rendering first, so a numeric
/// `123` buckets as `"123"`.
fn resolve_currency(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => DEFAULT_CURRENCY.to_string(),
        Some(Value::String(s)) => normalize_currency(s),
        Some(other) => normalize_currency(&other.to_string()),
    }
}

fn normalize_currency(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_scenario() {
        let raw = json!([
            {
                "currency": "USD",
                "payments": [
                    {"active": true, "incomeshare": 0.15, "amount": 2500, "base": 0.3},
                    {"active": false, "incomeshare": 0.25, "amount": 1000, "base": 0.5},
                    {"active": true, "incomeshare": 0.1, "amount": 750, "base": 0.2}
                ]
            },
            {
                "currency": "EUR",
                "payments": [
                    {"active": true, "incomeshare": 0.2, "amount": 1800, "base": 0.4},
                    {"active": true, "incomeshare": 0.35, "amount": 1200, "base": 0.7}
                ]
            },
            {
                "currency": "USD",
                "payments": [
                    {"active": true, "incomeshare": 0.05, "amount": 4000, "base": 0.1}
                ]
            }
        ]);

        // USD: 1250 + 375 + 2000, EUR: 900 + 600; every ratio here is an
        // exact 0.5 in f64, so the equality is exact.
        let expected =
            CurrencyTotals::from([("USD".to_string(), 3625.0), ("EUR".to_string(), 1500.0)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_missing_currency_defaults_to_gel() {
        let raw = json!([{
            "payments": [
                {"active": true, "incomeshare": 0.5, "amount": 100, "base": 1}
            ]
        }]);

        let expected = CurrencyTotals::from([("GEL".to_string(), 50.0)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_numeric_field_variations() {
        let raw = json!([{
            "currency": "USD",
            "payments": [
                {"active": true, "incomeshare": "0.5", "amount": "100", "base": "1"},
                {"active": true, "incomeshare": 0.5, "amount": 100.5, "base": 1.0},
                {"active": true, "incomeshare": null, "amount": 100, "base": 1},
                {"active": true, "incomeshare": 0.5, "amount": null, "base": 1},
                {"active": true, "incomeshare": 0.5, "amount": "", "base": 1},
                {"active": true, "incomeshare": "", "amount": 100, "base": 1}
            ]
        }]);

        // 50 + 50.25 + 100 + 100; the null and empty-string amounts skip.
        let expected = CurrencyTotals::from([("USD".to_string(), 300.25)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let raw = json!([{
            "currency": "USD",
            "payments": [
                {"active": true, "amount": 100, "base": 1},
                {"active": true, "incomeshare": 0.5, "base": 1},
                {"active": true, "incomeshare": 0.5, "amount": 100},
                {"active": true, "incomeshare": 0.5, "amount": 100, "base": null},
                {"active": true, "incomeshare": 0.5, "amount": 100, "base": 0},
                {"active": true, "incomeshare": "invalid", "amount": 100, "base": 1}
            ]
        }]);

        // First payment: default incomeshare 1.0 -> 100. Second: default
        // amount 0.0 -> 0. The rest skip.
        let expected = CurrencyTotals::from([("USD".to_string(), 100.0)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_multiple_currencies() {
        let raw = json!([
            {"currency": "USD", "payments": [{"active": true, "incomeshare": 0.2, "amount": 1000, "base": 0.5}]},
            {"currency": "EUR", "payments": [{"active": true, "incomeshare": 0.3, "amount": 600, "base": 0.6}]},
            {"currency": "USD", "payments": [{"active": true, "incomeshare": 0.1, "amount": 500, "base": 0.25}]}
        ]);

        let expected =
            CurrencyTotals::from([("USD".to_string(), 600.0), ("EUR".to_string(), 300.0)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_zero_values_still_create_bucket() {
        let raw = json!([{
            "currency": "USD",
            "payments": [
                {"active": true, "incomeshare": 0, "amount": 100, "base": 1},
                {"active": true, "incomeshare": 0.5, "amount": 0, "base": 1},
                {"active": true, "incomeshare": 0.5, "amount": 100, "base": 0}
            ]
        }]);

        // Two 0.0 contributions create the bucket; the zero-base payment
        // skips.
        let expected = CurrencyTotals::from([("USD".to_string(), 0.0)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_currency_normalization() {
        let payment = json!([{"active": true, "incomeshare": 0.5, "amount": 100, "base": 1}]);
        let raw = json!([
            {"currency": "usd", "payments": payment.clone()},
            {"currency": "  EUR  ", "payments": payment.clone()},
            {"currency": 123, "payments": payment.clone()},
            {"currency": null, "payments": payment.clone()},
            {"currency": "", "payments": payment.clone()},
            {"currency": "   ", "payments": payment.clone()},
            {"payments": payment}
        ]);

        let expected = CurrencyTotals::from([
            ("USD".to_string(), 50.0),
            ("EUR".to_string(), 50.0),
            ("123".to_string(), 50.0),
            ("GEL".to_string(), 200.0),
        ]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_structure_validation() {
        let raw = json!([
            "not an object",
            {"currency": "USD", "payments": "not a list"},
            {"currency": "USD", "payments": ["not an object"]},
            {"currency": "USD", "payments": []},
            {"currency": "USD"},
            {"currency": "USD", "payments": null}
        ]);

        assert!(calculate_payments(&raw).is_empty());
    }

    #[test]
    fn test_active_field_variations() {
        let raw = json!([{
            "currency": "USD",
            "payments": [
                {"active": true, "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": false, "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": "true", "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": "false", "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": "1", "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": "0", "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": 1, "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": 0, "incomeshare": 0.5, "amount": 100, "base": 1},
                {"incomeshare": 0.5, "amount": 100, "base": 1}
            ]
        }]);

        // Inactive: false, "false", "0", 0. Active: true, "true", "1", 1,
        // and the missing flag. 5 payments * 50 each.
        let expected = CurrencyTotals::from([("USD".to_string(), 250.0)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_active_flag_edge_values() {
        let raw = json!([{
            "currency": "USD",
            "payments": [
                {"active": [], "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": {}, "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": "True", "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": "FALSE", "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": null, "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": -1, "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": 0.0, "incomeshare": 0.5, "amount": 100, "base": 1}
            ]
        }]);

        // Everything outside the known-false set is active, containers and
        // null included; only the 0.0 flag is inactive here.
        let expected = CurrencyTotals::from([("USD".to_string(), 300.0)]);
        assert_eq!(calculate_payments(&raw), expected);
    }

    #[test]
    fn test_deeply_nested_invalid_data() {
        let raw = json!([{
            "currency": "USD",
            "payments": [
                {
                    "active": true,
                    "incomeshare": {"nested": "dict"},
                    "amount": [1, 2, 3],
                    "base": {"another": "dict"}
                },
                {
                    "active": {"complex": true},
                    "incomeshare": "not_a_number",
                    "amount": "also_not_a_number",
                    "base": "still_not_a_number"
                }
            ]
        }]);

        assert!(calculate_payments(&raw).is_empty());
    }

    #[test]
    fn test_non_array_input_yields_empty() {
        assert!(calculate_payments(&json!({"currency": "USD"})).is_empty());
        assert!(calculate_payments(&json!("payments")).is_empty());
        assert!(calculate_payments(&json!(null)).is_empty());
    }

    #[test]
    fn test_report_reasons() {
        let raw = json!([
            {"currency": "USD", "payments": [
                {"active": "false", "incomeshare": 0.5, "amount": 100, "base": 1},
                {"active": true, "incomeshare": 0.5, "amount": 100},
                {"active": true, "incomeshare": 0.5, "amount": 100, "base": 0},
                {"active": true, "incomeshare": 0.5, "amount": 100, "base": 2}
            ]},
            {"currency": "EUR"}
        ]);

        let report = calculate_payments_with_report(&raw);
        assert_eq!(report.totals["USD"], 25.0);
        assert_eq!(report.skipped.len(), 4);
        assert_eq!(report.skipped[0].reason, SkipReason::Inactive);
        assert_eq!(report.skipped[1].reason, SkipReason::MissingField("base"));
        assert_eq!(report.skipped[2].reason, SkipReason::ZeroBase);
        assert_eq!(
            report.skipped[3],
            SkippedPayment {
                applicant: 1,
                payment: None,
                reason: SkipReason::MissingField("payments"),
            }
        );
        assert_eq!(report.summary(), "Calculated: 1 currencies, 4 records skipped");
    }
}

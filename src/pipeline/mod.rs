//! Public entry points composing the pipeline stages.
//!
//! The transfer pipeline is staged: [`sanitize::clean`] feeds
//! [`aggregate::flatten`] feeds [`aggregate::aggregate`]. The payment
//! pipeline ([`crate::payments::calculate_payments`]) runs as a single
//! combined pass and is re-exported at the crate root next to the
//! functions here.
//!
//! Both `Value`-level functions never fail: malformed input degrades to
//! an empty or partial result. The `*_json` text helpers are the one
//! fallible surface, and only for JSON that does not parse at all.

use serde_json::Value;

use crate::aggregate;
use crate::error::IngestResult;
use crate::models::ApplicantSummary;
use crate::payments::{self, CurrencyTotals};
use crate::sanitize;

/// Run the full transfer pipeline on raw applicant records.
///
/// Sanitizes the untrusted input, flattens the survivors, and aggregates
/// them into summaries sorted by applicant id with groups sorted by
/// (country, period).
pub fn process_applicant_transfers(input: &Value) -> Vec<ApplicantSummary> {
    aggregate::aggregate(aggregate::flatten(sanitize::clean(input)))
}

/// Parse JSON text and run the transfer pipeline.
///
/// Fails only on malformed JSON text; once parsed, the never-fail
/// semantics of [`process_applicant_transfers`] apply.
pub fn process_applicant_transfers_json(json: &str) -> IngestResult<Vec<ApplicantSummary>> {
    let input: Value = serde_json::from_str(json)?;
    Ok(process_applicant_transfers(&input))
}

/// Parse JSON text and run the payment pipeline.
pub fn calculate_payments_json(json: &str) -> IngestResult<CurrencyTotals> {
    let input: Value = serde_json::from_str(json)?;
    Ok(payments::calculate_payments(&input))
}

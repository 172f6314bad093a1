//! Transfer sanitizer: the validation stage of the transfer pipeline.
//!
//! Raw input is an untrusted `serde_json::Value`. The sanitizer walks it
//! with a cascade of checks and keeps only fully valid data:
//!
//! - the input itself must be an array, otherwise the result is empty
//! - each element must be an object with a non-blank string `applicant_id`
//!   and a non-empty `transfers` array
//! - each transfer must carry all of `country`, `period`, `amountgel`,
//!   `source`, and every field must pass coercion ([`crate::coerce`])
//! - a transfer failing any rule is dropped whole; an applicant whose
//!   transfers all fail is dropped whole
//!
//! Nothing here returns an error to the caller: malformed records are
//! dropped and processing continues. Each drop is classified with a
//! [`RejectReason`]; [`clean`] discards the bookkeeping, while
//! [`clean_with_report`] returns it next to the survivors.

use serde_json::Value;
use tracing::debug;

use crate::coerce;
use crate::error::RejectReason;
use crate::models::{Applicant, Transfer};

/// Fields every raw transfer must carry.
const REQUIRED_TRANSFER_FIELDS: [&str; 4] = ["country", "period", "amountgel", "source"];

// =============================================================================
// Report Types
// =============================================================================

/// Outcome of a cleaning pass: survivors plus drop bookkeeping.
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Applicants that survived with at least one valid transfer, in
    /// input order.
    pub applicants: Vec<Applicant>,
    /// Records dropped along the way, with their input positions.
    pub skipped: Vec<SkippedRecord>,
}

impl CleanReport {
    /// Summary counts for diagnostics.
    pub fn summary(&self) -> String {
        format!(
            "Cleaned: {} applicants kept, {} records dropped",
            self.applicants.len(),
            self.skipped.len()
        )
    }
}

/// A record dropped during cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Index of the applicant element in the input sequence.
    pub applicant: usize,
    /// Index of the transfer within the applicant, for transfer-level drops.
    pub transfer: Option<usize>,
    /// Why the record was dropped.
    pub reason: RejectReason,
}

// =============================================================================
// Cleaning
// =============================================================================

/// Sanitize raw applicant records, keeping only fully valid data.
///
/// Never fails: a non-array input, malformed elements, or unusable fields
/// all degrade to fewer (or zero) survivors. Output order mirrors input
/// order.
pub fn clean(raw: &Value) -> Vec<Applicant> {
    clean_with_report(raw).applicants
}

/// Sanitize raw applicant records and keep the drop bookkeeping.
pub fn clean_with_report(raw: &Value) -> CleanReport {
    let mut report = CleanReport::default();

    let elements = match raw.as_array() {
        Some(elements) => elements,
        None => return report,
    };

    for (index, element) in elements.iter().enumerate() {
        match clean_applicant(element, index, &mut report.skipped) {
            Ok(applicant) => report.applicants.push(applicant),
            Err(reason) => {
                debug!(applicant = index, %reason, "dropped applicant");
                report.skipped.push(SkippedRecord {
                    applicant: index,
                    transfer: None,
                    reason,
                });
            }
        }
    }

    report
}

/// Validate one raw applicant element.
///
/// Transfer-level drops are recorded in `skipped`; the applicant itself is
/// rejected when its id or transfers list is unusable, or when no transfer
/// survives.
fn clean_applicant(
    element: &Value,
    index: usize,
    skipped: &mut Vec<SkippedRecord>,
) -> Result<Applicant, RejectReason> {
    let record = element.as_object().ok_or(RejectReason::NotAnObject)?;

    let applicant_id = record
        .get("applicant_id")
        .ok_or(RejectReason::MissingField("applicant_id"))
        .and_then(|value| {
            coerce::non_blank_str(value).ok_or(RejectReason::InvalidField("applicant_id"))
        })?;

    let raw_transfers = record
        .get("transfers")
        .ok_or(RejectReason::MissingField("transfers"))
        .and_then(|value| value.as_array().ok_or(RejectReason::InvalidField("transfers")))?;

    let mut transfers = Vec::new();
    for (position, raw) in raw_transfers.iter().enumerate() {
        match clean_transfer(raw) {
            Ok(transfer) => transfers.push(transfer),
            Err(reason) => {
                debug!(applicant = index, transfer = position, %reason, "dropped transfer");
                skipped.push(SkippedRecord {
                    applicant: index,
                    transfer: Some(position),
                    reason,
                });
            }
        }
    }

    if transfers.is_empty() {
        return Err(RejectReason::NoValidTransfers);
    }

    Ok(Applicant {
        applicant_id: applicant_id.to_string(),
        transfers,
    })
}

/// Validate one raw transfer element.
///
/// All four fields must be present and pass coercion; any failure rejects
/// the whole transfer, never a partial record.
fn clean_transfer(raw: &Value) -> Result<Transfer, RejectReason> {
    let record = raw.as_object().ok_or(RejectReason::NotAnObject)?;

    for field in REQUIRED_TRANSFER_FIELDS {
        if !record.contains_key(field) {
            return Err(RejectReason::MissingField(field));
        }
    }

    let country = record
        .get("country")
        .and_then(coerce::non_blank_str)
        .ok_or(RejectReason::InvalidField("country"))?;
    let period = record
        .get("period")
        .and_then(coerce::to_whole_i64)
        .ok_or(RejectReason::InvalidField("period"))?;
    let amountgel = record
        .get("amountgel")
        .and_then(coerce::to_f64)
        .ok_or(RejectReason::InvalidField("amountgel"))?;
    let source = record
        .get("source")
        .and_then(coerce::non_blank_str)
        .ok_or(RejectReason::InvalidField("source"))?;

    Ok(Transfer {
        country: country.to_string(),
        period,
        amountgel,
        source: source.to_string(),
    })
}

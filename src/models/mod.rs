//! Domain models for the remitsum pipelines.
//!
//! This module contains the data structures flowing between pipeline stages:
//!
//! - [`Transfer`] - a single validated transfer record
//! - [`Applicant`] - an applicant with its surviving transfers
//! - [`FlatTransfer`] - flattener output, one record per transfer
//! - [`GroupedTransfer`] - one aggregated (country, period) group
//! - [`ApplicantSummary`] - final per-applicant aggregation result
//!
//! All types serialize to the wire shape consumed downstream; the field
//! names are the wire names, so no rename attributes are needed.

use serde::{Deserialize, Serialize};

// =============================================================================
// Sanitized Input
// =============================================================================

/// A single validated financial transfer.
///
/// Produced only by the sanitizer; every field has already passed the
/// per-field coercion rules (trimmed non-empty strings, whole-integer
/// period, numeric amount).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// Country the transfer originates from (trimmed, non-empty).
    pub country: String,
    /// Reporting period, exactly representable as an integer.
    pub period: i64,
    /// Transfer amount in GEL.
    pub amountgel: f64,
    /// Reporting source (trimmed, non-empty).
    pub source: String,
}

/// An applicant with at least one valid transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    /// Applicant identifier (trimmed, non-empty).
    pub applicant_id: String,
    /// Surviving transfers, in input order.
    pub transfers: Vec<Transfer>,
}

// =============================================================================
// Flattened Records
// =============================================================================

/// One denormalized transfer with its applicant id copied on.
///
/// The flattener emits one of these per surviving transfer; the first three
/// fields form the aggregation key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatTransfer {
    /// Owning applicant.
    pub applicant_id: String,
    /// Transfer country.
    pub country: String,
    /// Reporting period.
    pub period: i64,
    /// Transfer amount in GEL.
    pub amountgel: f64,
    /// Reporting source.
    pub source: String,
}

// =============================================================================
// Aggregated Output
// =============================================================================

/// One aggregated group of transfers sharing (country, period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedTransfer {
    /// Group country.
    pub country: String,
    /// Group period.
    pub period: i64,
    /// Sum of the group's transfer amounts.
    pub amountgel: f64,
    /// Unique contributing sources, lexicographically joined with `/`.
    pub source: String,
}

/// Final aggregation result for one applicant.
///
/// Groups are sorted by (country, period); the outer sequence of summaries
/// is sorted by applicant id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSummary {
    /// Applicant identifier.
    pub applicant_id: String,
    /// Aggregated transfer groups in deterministic order.
    pub grouped_transfers: Vec<GroupedTransfer>,
}

impl ApplicantSummary {
    /// Create a summary with no groups yet.
    pub fn new(applicant_id: String) -> Self {
        Self {
            applicant_id,
            grouped_transfers: Vec::new(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

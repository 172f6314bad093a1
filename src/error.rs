//! Error and rejection types for the remitsum pipelines.
//!
//! This module defines the reason types threaded through both pipelines:
//!
//! - [`RejectReason`] - why the transfer sanitizer dropped a record
//! - [`SkipReason`] - why the payment pipeline skipped a record
//! - [`IngestError`] - JSON text ingestion errors
//!
//! The reason enums never propagate out of the `Value`-level API; a
//! malformed record is dropped and processing continues. They surface only
//! in the report variants and in debug-level diagnostics. [`IngestError`]
//! is the one fallible boundary, and only for the `*_json` text helpers.

use thiserror::Error;

// =============================================================================
// Transfer Sanitizer Rejections
// =============================================================================

/// Why an applicant or transfer record was rejected during cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The record is not a JSON object.
    #[error("Record is not a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but failed validation or coercion.
    #[error("Invalid value for field '{0}'")]
    InvalidField(&'static str),

    /// The transfers list was empty or every entry was rejected.
    #[error("No valid transfers remain")]
    NoValidTransfers,
}

// =============================================================================
// Payment Skips
// =============================================================================

/// Why a payment record was skipped during calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The record is not a JSON object.
    #[error("Record is not a JSON object")]
    NotAnObject,

    /// The active flag resolved to false.
    #[error("Payment is marked inactive")]
    Inactive,

    /// A required field is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but failed coercion.
    #[error("Invalid value for field '{0}'")]
    InvalidField(&'static str),

    /// The base is zero, so no ratio can be formed.
    #[error("Payment base is zero")]
    ZeroBase,
}

// =============================================================================
// JSON Ingestion Errors
// =============================================================================

/// Errors when ingesting raw JSON text.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input is not valid JSON.
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for JSON text ingestion.
pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_display() {
        let reason = RejectReason::MissingField("period");
        assert!(reason.to_string().contains("period"));

        let reason = RejectReason::InvalidField("amountgel");
        assert!(reason.to_string().contains("amountgel"));
    }

    #[test]
    fn test_skip_reason_display() {
        assert!(SkipReason::Inactive.to_string().contains("inactive"));
        assert!(SkipReason::ZeroBase.to_string().contains("zero"));
    }

    #[test]
    fn test_ingest_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: IngestError = parse_err.into();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}

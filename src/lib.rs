//! # Remitsum - applicant transfer and payment aggregation
//!
//! Remitsum sanitizes untrusted, loosely-typed financial records and
//! aggregates the survivors into deterministic, sorted summaries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Raw Value  │────▶│  Sanitizer  │────▶│  Flattener  │────▶│ Aggregator  │
//! │  (untyped)  │     │(coerce/drop)│     │(denormalize)│     │(group+sort) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The payment pipeline runs the same idea in one combined pass: each
//! payment is screened and immediately accumulated into its applicant's
//! currency bucket.
//!
//! Neither pipeline ever fails on malformed data. Unusable records are
//! dropped with a classified reason and processing continues; the only
//! fallible surface is the `*_json` text helpers, and only for input that
//! is not JSON at all.
//!
//! ## Quick Start
//!
//! ```rust
//! use remitsum::process_applicant_transfers;
//! use serde_json::json;
//!
//! let raw = json!([{
//!     "applicant_id": "APP_001",
//!     "transfers": [
//!         {"country": "USA", "period": 1, "amountgel": 100.0, "source": "A"},
//!         {"country": "USA", "period": 1, "amountgel": 50.0, "source": "B"}
//!     ]
//! }]);
//!
//! let summaries = process_applicant_transfers(&raw);
//! assert_eq!(summaries[0].grouped_transfers[0].amountgel, 150.0);
//! assert_eq!(summaries[0].grouped_transfers[0].source, "A/B");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - rejection reasons and ingest errors
//! - [`models`] - domain models (Transfer, ApplicantSummary, ...)
//! - [`coerce`] - shared field-coercion policy
//! - [`sanitize`] - transfer sanitizer
//! - [`aggregate`] - flattener and grouping/sorting
//! - [`payments`] - payment screening and currency totals
//! - [`pipeline`] - public entry points and JSON text helpers

// Core modules
pub mod error;
pub mod models;

// Shared coercion policy
pub mod coerce;

// Transfer pipeline
pub mod aggregate;
pub mod sanitize;

// Payment pipeline
pub mod payments;

// Entry points
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{IngestError, IngestResult, RejectReason, SkipReason};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Applicant, ApplicantSummary, FlatTransfer, GroupedTransfer, Transfer};

// =============================================================================
// Re-exports - Sanitizer
// =============================================================================

pub use sanitize::{clean, clean_with_report, CleanReport, SkippedRecord};

// =============================================================================
// Re-exports - Aggregation
// =============================================================================

pub use aggregate::{aggregate, flatten};

// =============================================================================
// Re-exports - Payments
// =============================================================================

pub use payments::{
    calculate_payments, calculate_payments_with_report, CurrencyTotals, PaymentReport,
    SkippedPayment, DEFAULT_CURRENCY,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    calculate_payments_json, process_applicant_transfers, process_applicant_transfers_json,
};

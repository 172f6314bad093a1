//! Flatten validated applicants and aggregate transfers into sorted groups.
//!
//! This is the reduction stage of the transfer pipeline: transfers sharing
//! (applicant, country, period) collapse into one group with a summed
//! amount and a merged source set.
//!
//! # Architecture
//!
//! ```text
//! Flat records                    →  Grouped output
//! ┌─────────────────────────┐       ┌─────────────────────────┐
//! │ APP_1, USA, 1, 100.0, A │       │ APP_1                   │
//! │ APP_1, USA, 1,  50.0, B │  →    │   USA, 1, 150.0, "A/B"  │
//! │ APP_1, GE,  2,  70.0, A │       │   GE,  2,  70.0, "A"    │
//! └─────────────────────────┘       └─────────────────────────┘
//! ```
//!
//! Output ordering is fully deterministic: applicants sort by id and each
//! applicant's groups sort by (country, period). Group sums apply f64
//! addition in input encounter order, so permuting the input can move the
//! low-order bits of a sum when amounts are not exactly representable;
//! source-set union is order-independent.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Applicant, ApplicantSummary, FlatTransfer, GroupedTransfer};

/// Denormalize surviving applicants into one record per transfer.
///
/// Pure reshaping: no validation happens here, input is assumed already
/// sanitized.
pub fn flatten(applicants: Vec<Applicant>) -> Vec<FlatTransfer> {
    let mut flat = Vec::new();

    for applicant in applicants {
        for transfer in applicant.transfers {
            flat.push(FlatTransfer {
                applicant_id: applicant.applicant_id.clone(),
                country: transfer.country,
                period: transfer.period,
                amountgel: transfer.amountgel,
                source: transfer.source,
            });
        }
    }

    flat
}

/// Group flat records by (applicant, country, period), reduce each group,
/// and emit summaries in deterministic order.
pub fn aggregate(flat: Vec<FlatTransfer>) -> Vec<ApplicantSummary> {
    let mut groups: HashMap<(String, String, i64), GroupAccumulator> = HashMap::new();

    for record in flat {
        let key = (
            record.applicant_id.clone(),
            record.country.clone(),
            record.period,
        );
        groups.entry(key).or_default().add(record);
    }

    // Tuple ordering gives applicant id first, then country, then period.
    let mut entries: Vec<_> = groups.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut summaries: Vec<ApplicantSummary> = Vec::new();
    for ((applicant_id, country, period), accumulator) in entries {
        let group = accumulator.build(country, period);
        match summaries.last_mut() {
            Some(last) if last.applicant_id == applicant_id => {
                last.grouped_transfers.push(group);
            }
            _ => {
                let mut summary = ApplicantSummary::new(applicant_id);
                summary.grouped_transfers.push(group);
                summaries.push(summary);
            }
        }
    }

    summaries
}

/// Accumulator for one (applicant, country, period) group.
#[derive(Debug, Default)]
struct GroupAccumulator {
    amountgel: f64,
    sources: BTreeSet<String>,
}

impl GroupAccumulator {
    fn add(&mut self, record: FlatTransfer) {
        self.amountgel += record.amountgel;
        self.sources.insert(record.source);
    }

    fn build(self, country: String, period: i64) -> GroupedTransfer {
        let source = self
            .sources
            .into_iter()
            .collect::<Vec<_>>()
            .join("/");

        GroupedTransfer {
            country,
            period,
            amountgel: self.amountgel,
            source,
        }
    }
}

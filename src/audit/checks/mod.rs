//! Atomic predicate checks over record sets.
//!
//! Every check is a pure function of its inputs: it reads the current batch
//! (and, where relevant, the historical ledger) and produces an outcome with
//! the abnormal subset annotated on stage-local copies. Rule violations are
//! not errors; malformed input is the caller's responsibility.

mod departure;
mod expiry;
mod quota;
pub(crate) mod relocation;

pub use departure::departure_reported;
pub use expiry::expiry_window;
pub use quota::{job_quota, QuotaOutcome};
pub use relocation::{
    cross_employer_relocation, daily_counts_by_form, relocation_window, DailyCount,
    RelocationOutcome, RelocationSpan,
};

use serde::Serialize;

use super::domain::{AnnotatedRecord, AuditStatus};

/// Outcome shared by the departure and expiry checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub status: AuditStatus,
    pub count_abnormal: usize,
    pub records: Vec<AnnotatedRecord>,
}

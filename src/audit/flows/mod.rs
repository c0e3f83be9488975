//! Named audit flows: fixed-order decision trees composing the atomic
//! checks with early exit, stage-specific case codes, and a per-flow
//! verdict shape.

pub mod config;
mod cross_employer;
mod inbound;
mod job_quota;

pub use config::{FlowConfigError, QuotaBucket, QuotaConfig, RelocationConfig, CATCH_ALL_JOB};
pub use cross_employer::{run_cross_employer_flow, CrossEmployerResult};
pub use inbound::{run_inbound_relocation_flow, InboundRelocationResult};
pub use job_quota::{run_job_quota_flow, JobQuotaResult};

use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{AnnotatedRecord, AuditStatus};

/// Verdict fields shared by every flow result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub status: AuditStatus,
    pub message: String,
    pub count_abnormal: usize,
}

impl Verdict {
    pub(crate) fn new(status: AuditStatus, message: &str, count_abnormal: usize) -> Self {
        Self {
            status,
            message: message.to_string(),
            count_abnormal,
        }
    }
}

/// Aliens named by a stage's flagged subset, used to narrow the working set
/// before the next stage runs.
pub(crate) fn flagged_aliens(records: &[AnnotatedRecord]) -> BTreeSet<String> {
    records
        .iter()
        .map(|annotated| annotated.record.alien_id.clone())
        .collect()
}

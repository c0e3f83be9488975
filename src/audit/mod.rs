//! Compliance rule evaluation pipeline for employment-permit records.
//!
//! A batch of current application records and a historical ledger are run
//! through named flows, each a fixed-order decision tree over the atomic
//! checks in [`checks`]. Every stage annotates the subset of records it
//! judged, and the flow concatenates the stage outputs into one report with
//! per-record case codes. The whole pipeline is synchronous and pure:
//! identical inputs and configuration always produce the identical result.

pub mod checks;
pub mod domain;
pub mod flows;
pub mod report;

#[cfg(test)]
mod tests;

pub use checks::{CheckOutcome, DailyCount, QuotaOutcome, RelocationOutcome, RelocationSpan};
pub use domain::{
    AnnotatedRecord, AuditStatus, CaseCode, MasterFormType, Record, RecordSet, ReportRow,
};
pub use flows::{
    run_cross_employer_flow, run_inbound_relocation_flow, run_job_quota_flow, CrossEmployerResult,
    FlowConfigError, InboundRelocationResult, JobQuotaResult, QuotaBucket, QuotaConfig,
    RelocationConfig, Verdict, CATCH_ALL_JOB,
};

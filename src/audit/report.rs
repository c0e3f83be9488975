//! Final report assembly.
//!
//! Each flow stage hands over its annotated subset; rows are stamped with
//! the stage's case code and concatenated in stage order. Records that
//! appear in more than one stage's subset are kept as-is: the report is a
//! stage-by-stage account, not a deduplicated record listing.

use super::domain::{AnnotatedRecord, AuditStatus, CaseCode, ReportRow};

/// Stamp every row of a stage with one fixed case code.
pub fn stamp(records: Vec<AnnotatedRecord>, case_code: CaseCode) -> Vec<ReportRow> {
    records
        .into_iter()
        .map(|annotated| ReportRow {
            annotated,
            case_code,
        })
        .collect()
}

/// Stamp rows by their individual status: "pass" for normal rows, the given
/// stage code for abnormal ones.
pub fn stamp_by_status(
    records: Vec<AnnotatedRecord>,
    abnormal_code: CaseCode,
) -> Vec<ReportRow> {
    records
        .into_iter()
        .map(|annotated| {
            let case_code = match annotated.status {
                AuditStatus::Normal => CaseCode::Pass,
                AuditStatus::Abnormal => abnormal_code,
            };
            ReportRow {
                annotated,
                case_code,
            }
        })
        .collect()
}

/// Concatenate stage outputs in stage order.
pub fn merge_stages<I: IntoIterator<Item = Vec<ReportRow>>>(stages: I) -> Vec<ReportRow> {
    stages.into_iter().flatten().collect()
}

use serde::Serialize;
use tracing::debug;

use super::{flagged_aliens, Verdict};
use crate::audit::checks::{
    cross_employer_relocation, departure_reported, expiry_window, RelocationSpan,
};
use crate::audit::domain::{AuditStatus, CaseCode, RecordSet, ReportRow};
use crate::audit::flows::config::{FlowConfigError, RelocationConfig};
use crate::audit::report::{merge_stages, stamp, stamp_by_status};

const MSG_NORMAL: &str = "Aliens moved from A to B not exceeding the limit of people and have \
     been relocated for less than a specified number of days.";
const MSG_RELOCATE: &str = "Aliens moved from A to B exceeding the limit of people and have \
     been relocated for more than a specified number of days.";
const MSG_DEPARTURE: &str = "Aliens has not yet reported their departure from the old company \
     but has already applied for the new one.";
const MSG_EXPIRE: &str = "The application submission date and the expiration date of the work \
     permit is less than or equal to 30 days.";

/// Result of the cross-employer relocation flow (rule R2, movement A to B).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossEmployerResult {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub total_relocate_day: Option<RelocationSpan>,
    pub data: Vec<ReportRow>,
}

/// Flow 2: departure reporting, then the permit-expiry window, then the
/// A-to-B relocation window, each stage narrowing the working set.
pub fn run_cross_employer_flow(
    current: &RecordSet,
    historical: &RecordSet,
    config: &RelocationConfig,
    employer_a: &str,
    employer_b: &str,
) -> Result<CrossEmployerResult, FlowConfigError> {
    config.validate()?;

    let departure = departure_reported(current, historical);
    debug!(
        stage = "departure",
        status = %departure.status,
        count_abnormal = departure.count_abnormal,
        "cross-employer flow stage 1"
    );

    if departure.status.is_abnormal() {
        return Ok(CrossEmployerResult {
            verdict: Verdict::new(AuditStatus::Abnormal, MSG_DEPARTURE, departure.count_abnormal),
            total_relocate_day: None,
            data: stamp(departure.records, CaseCode::R2Stage1),
        });
    }

    let departed = flagged_aliens(&departure.records);
    let current_remaining = current.without_aliens(&departed);
    let historical_remaining = historical.without_aliens(&departed);

    let expiry = expiry_window(&current_remaining, &historical_remaining);
    debug!(
        stage = "expiry",
        status = %expiry.status,
        count_abnormal = expiry.count_abnormal,
        "cross-employer flow stage 2"
    );

    if expiry.status.is_abnormal() {
        let departure_rows = stamp(departure.records, CaseCode::R1Stage2);
        let expiry_rows = stamp(expiry.records, CaseCode::R2Stage2);
        return Ok(CrossEmployerResult {
            verdict: Verdict::new(AuditStatus::Abnormal, MSG_EXPIRE, expiry.count_abnormal),
            total_relocate_day: None,
            data: merge_stages([departure_rows, expiry_rows]),
        });
    }

    let expiring = flagged_aliens(&expiry.records);
    let current_narrowed = current_remaining.without_aliens(&expiring);
    let historical_narrowed = historical_remaining.without_aliens(&expiring);

    let relocation = cross_employer_relocation(
        &current_narrowed,
        &historical_narrowed,
        config.max_count,
        config.window_days,
        employer_a,
        employer_b,
    );
    debug!(
        stage = "relocation",
        status = %relocation.status,
        count_abnormal = relocation.count_abnormal,
        "cross-employer flow stage 3"
    );

    if relocation.status.is_abnormal() {
        let departure_rows = stamp(departure.records, CaseCode::R1Stage2);
        let expiry_rows = stamp(expiry.records, CaseCode::R2Stage2);
        let relocation_rows = stamp(relocation.records, CaseCode::R2Stage3);
        return Ok(CrossEmployerResult {
            verdict: Verdict::new(AuditStatus::Abnormal, MSG_RELOCATE, relocation.count_abnormal),
            total_relocate_day: Some(relocation.total_relocate_day),
            data: merge_stages([departure_rows, expiry_rows, relocation_rows]),
        });
    }

    // On a clean run every merged row is stamped by its own status.
    let combined: Vec<_> = departure
        .records
        .into_iter()
        .chain(expiry.records)
        .chain(relocation.records)
        .collect();
    Ok(CrossEmployerResult {
        verdict: Verdict::new(AuditStatus::Normal, MSG_NORMAL, relocation.count_abnormal),
        total_relocate_day: Some(relocation.total_relocate_day),
        data: stamp_by_status(combined, CaseCode::R2Stage3),
    })
}

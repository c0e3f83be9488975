use serde::Serialize;
use tracing::debug;

use super::{flagged_aliens, Verdict};
use crate::audit::checks::{
    daily_counts_by_form, departure_reported, relocation_window, RelocationSpan,
};
use crate::audit::domain::{AuditStatus, CaseCode, RecordSet, ReportRow};
use crate::audit::flows::config::{FlowConfigError, RelocationConfig};
use crate::audit::report::{merge_stages, stamp, stamp_by_status};

const MSG_NORMAL: &str = "Aliens moved to B not exceeding the limit of people and have been \
     relocated for less than a specified number of days.";
const MSG_RELOCATE: &str = "Aliens moved to B exceeding the limit of people and have been \
     relocated for more than a specified number of days.";
const MSG_DEPARTURE: &str = "Aliens have not yet reported their departure from the old company \
     but have already applied for the new one.";

/// Result of the inbound relocation flow (rule R4, movement into B).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InboundRelocationResult {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub total_relocate_day: Option<RelocationSpan>,
    pub data: Vec<ReportRow>,
}

/// Flow 4: departure reporting, then the relocation window over the combined
/// daily volume of ledger and batch.
pub fn run_inbound_relocation_flow(
    current: &RecordSet,
    historical: &RecordSet,
    config: &RelocationConfig,
) -> Result<InboundRelocationResult, FlowConfigError> {
    config.validate()?;

    let departure = departure_reported(current, historical);
    debug!(
        stage = "departure",
        status = %departure.status,
        count_abnormal = departure.count_abnormal,
        "inbound relocation flow stage 1"
    );

    if departure.status.is_abnormal() {
        return Ok(InboundRelocationResult {
            verdict: Verdict::new(AuditStatus::Abnormal, MSG_DEPARTURE, departure.count_abnormal),
            total_relocate_day: None,
            data: stamp(departure.records, CaseCode::R4Stage1),
        });
    }

    let departed = flagged_aliens(&departure.records);
    let current_remaining = current.without_aliens(&departed);
    let historical_remaining = historical.without_aliens(&departed);

    // Ledger volume first, then the batch, matching the upstream aggregate.
    let mut daily_counts = daily_counts_by_form(&historical_remaining);
    daily_counts.extend(daily_counts_by_form(&current_remaining));

    let relocation = relocation_window(
        &current_remaining,
        &daily_counts,
        config.max_count,
        config.window_days,
    );
    debug!(
        stage = "relocation",
        status = %relocation.status,
        count_abnormal = relocation.count_abnormal,
        "inbound relocation flow stage 2"
    );

    if relocation.status.is_abnormal() {
        let departure_rows = stamp(departure.records, CaseCode::R4Stage1);
        let relocation_rows = stamp(relocation.records, CaseCode::R4Stage2);
        return Ok(InboundRelocationResult {
            verdict: Verdict::new(AuditStatus::Abnormal, MSG_RELOCATE, relocation.count_abnormal),
            total_relocate_day: Some(relocation.total_relocate_day),
            data: merge_stages([departure_rows, relocation_rows]),
        });
    }

    let combined: Vec<_> = departure
        .records
        .into_iter()
        .chain(relocation.records)
        .collect();
    Ok(InboundRelocationResult {
        verdict: Verdict::new(AuditStatus::Normal, MSG_NORMAL, relocation.count_abnormal),
        total_relocate_day: Some(relocation.total_relocate_day),
        data: stamp_by_status(combined, CaseCode::R4Stage2),
    })
}

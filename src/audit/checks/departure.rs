use super::CheckOutcome;
use crate::audit::domain::{AnnotatedRecord, AuditStatus, MasterFormType, RecordSet};

pub(crate) const DEPARTURE_NOT_REPORTED: &str =
    "Aliens have not yet reported their departure from the old company.";

/// Flag current applications whose alien's latest ledger entry is not a
/// departure report.
///
/// Only application records are audited. An alien passes when the latest
/// historical record for that alien is an exit form; aliens with no history
/// at all fail. The overall status is normal only when strictly fewer
/// records fail than were audited, so a batch where every application fails
/// (including an empty batch) comes back abnormal.
pub fn departure_reported(current: &RecordSet, historical: &RecordSet) -> CheckOutcome {
    let mut audited = 0usize;
    let mut abnormal = Vec::new();

    for record in current.applications() {
        audited += 1;
        let exit_reported = historical
            .latest_for_alien(&record.alien_id)
            .map(|latest| latest.master_form_type == MasterFormType::Exit)
            .unwrap_or(false);
        if !exit_reported {
            abnormal.push(AnnotatedRecord::abnormal(
                record.clone(),
                DEPARTURE_NOT_REPORTED,
            ));
        }
    }

    let count_abnormal = abnormal.len();
    let status = if count_abnormal < audited {
        AuditStatus::Normal
    } else {
        AuditStatus::Abnormal
    };

    CheckOutcome {
        status,
        count_abnormal,
        records: abnormal,
    }
}

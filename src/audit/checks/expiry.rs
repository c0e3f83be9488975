use std::collections::BTreeSet;

use chrono::Duration;

use super::CheckOutcome;
use crate::audit::domain::{AnnotatedRecord, AuditStatus, MasterFormType, Record, RecordSet};

pub(crate) const EXPIRY_TOO_CLOSE: &str = "The application submission date and the expiration \
     date of the work permit is less than or equal to 30 days.";

const MINIMUM_REMAINING_DAYS: i64 = 30;

/// Flag applications filed with fewer than 30 days of permit validity left.
///
/// Current application records are joined with historical exit records on
/// `alien_id`; a pair is abnormal when the application timestamp plus 30
/// days lands strictly past the exit record's `valid_until` (exactly 30
/// days remaining is still normal). Exit records without a `valid_until`
/// never flag a pair. `count_abnormal` counts joined pairs, while the
/// returned subset holds every current record for a flagged alien.
pub fn expiry_window(current: &RecordSet, historical: &RecordSet) -> CheckOutcome {
    let exits: Vec<&Record> = historical
        .iter()
        .filter(|record| record.master_form_type == MasterFormType::Exit)
        .collect();

    let mut joined_pairs = 0usize;
    let mut abnormal_pairs = 0usize;
    let mut abnormal_aliens: BTreeSet<&str> = BTreeSet::new();

    for application in current.applications() {
        for exit in exits
            .iter()
            .filter(|exit| exit.alien_id == application.alien_id)
        {
            joined_pairs += 1;
            let too_close = exit.valid_until.is_some_and(|valid_until| {
                application.created_timestamp + Duration::days(MINIMUM_REMAINING_DAYS)
                    > valid_until
            });
            if too_close {
                abnormal_pairs += 1;
                abnormal_aliens.insert(application.alien_id.as_str());
            }
        }
    }

    let records: Vec<AnnotatedRecord> = current
        .iter()
        .filter(|record| abnormal_aliens.contains(record.alien_id.as_str()))
        .map(|record| AnnotatedRecord::abnormal(record.clone(), EXPIRY_TOO_CLOSE))
        .collect();

    let status = if joined_pairs > abnormal_pairs {
        AuditStatus::Normal
    } else {
        AuditStatus::Abnormal
    };

    CheckOutcome {
        status,
        count_abnormal: abnormal_pairs,
        records,
    }
}

use chrono::{NaiveDate, NaiveDateTime};

use crate::audit::domain::{MasterFormType, Record, RecordSet};
use crate::audit::flows::{QuotaBucket, QuotaConfig, CATCH_ALL_JOB};

pub(super) fn ts(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").expect("valid timestamp")
}

pub(super) fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}

pub(super) fn record(
    alien_id: &str,
    employer_no: &str,
    form_id: &str,
    job: &str,
    master_form_type: MasterFormType,
    created: &str,
    valid_until: Option<&str>,
) -> Record {
    Record {
        alien_id: alien_id.to_string(),
        employer_no: employer_no.to_string(),
        form_id: form_id.to_string(),
        job_description: job.to_string(),
        master_form_type,
        created_timestamp: ts(created),
        valid_until: valid_until.map(ts),
    }
}

pub(super) fn application(alien_id: &str, employer_no: &str, job: &str, created: &str) -> Record {
    record(
        alien_id,
        employer_no,
        "WP-59",
        job,
        MasterFormType::Application,
        created,
        None,
    )
}

pub(super) fn exit_report(
    alien_id: &str,
    employer_no: &str,
    created: &str,
    valid_until: Option<&str>,
) -> Record {
    record(
        alien_id,
        employer_no,
        "WP-13",
        "",
        MasterFormType::Exit,
        created,
        valid_until,
    )
}

pub(super) fn set(records: Vec<Record>) -> RecordSet {
    RecordSet::new(records)
}

pub(super) fn quota_config() -> QuotaConfig {
    QuotaConfig::new(vec![
        QuotaBucket {
            job: "กรรมกร".to_string(),
            max_count: 10,
        },
        QuotaBucket {
            job: "งานขายของหน้าร้าน".to_string(),
            max_count: 10,
        },
        QuotaBucket {
            job: CATCH_ALL_JOB.to_string(),
            max_count: 10,
        },
    ])
}

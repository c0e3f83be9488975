use serde::Serialize;
use tracing::debug;

use super::{flagged_aliens, Verdict};
use crate::audit::checks::{departure_reported, job_quota};
use crate::audit::domain::{AuditStatus, CaseCode, RecordSet, ReportRow};
use crate::audit::flows::config::{FlowConfigError, QuotaConfig};
use crate::audit::report::{merge_stages, stamp, stamp_by_status};

const MSG_NORMAL: &str = "Aliens have reported their departure from the old company, and the \
     employer hires not more than 10 aliens for different types of work and positions.";
const MSG_DEPARTURE: &str = "Some aliens have not yet reported their departure from the old \
     company.";
const MSG_QUOTA: &str = "Aliens have reported their departure from the old company. However, \
     the employer hires more than 10 aliens for different types of work and positions.";

/// Result of the job-quota compliance flow (rule R1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobQuotaResult {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub job_abnormal: Option<Vec<String>>,
    pub data: Vec<ReportRow>,
}

/// Flow 1: departure reporting, then job quotas on the remaining aliens.
pub fn run_job_quota_flow(
    current: &RecordSet,
    historical: &RecordSet,
    config: &QuotaConfig,
) -> Result<JobQuotaResult, FlowConfigError> {
    config.validate()?;

    let departure = departure_reported(current, historical);
    debug!(
        stage = "departure",
        status = %departure.status,
        count_abnormal = departure.count_abnormal,
        "job-quota flow stage 1"
    );

    if departure.status.is_abnormal() {
        return Ok(JobQuotaResult {
            verdict: Verdict::new(AuditStatus::Abnormal, MSG_DEPARTURE, departure.count_abnormal),
            job_abnormal: None,
            data: stamp(departure.records, CaseCode::R1Stage1),
        });
    }

    let remainder = current.without_aliens(&flagged_aliens(&departure.records));
    let quota = job_quota(&remainder, config);
    debug!(
        stage = "quota",
        status = %quota.status,
        count_abnormal = quota.count_abnormal,
        "job-quota flow stage 2"
    );

    let departure_rows = stamp(departure.records, CaseCode::R1Stage1);

    if quota.status.is_abnormal() {
        // A failed quota stage condemns the whole stage subset.
        let mut quota_records = quota.records;
        for annotated in &mut quota_records {
            annotated.status = AuditStatus::Abnormal;
        }
        let quota_rows = stamp_by_status(quota_records, CaseCode::R1Stage2);
        return Ok(JobQuotaResult {
            verdict: Verdict::new(AuditStatus::Abnormal, MSG_QUOTA, quota.count_abnormal),
            job_abnormal: Some(quota.job_abnormal),
            data: merge_stages([departure_rows, quota_rows]),
        });
    }

    let quota_rows = stamp_by_status(quota.records, CaseCode::R1Stage2);
    Ok(JobQuotaResult {
        verdict: Verdict::new(AuditStatus::Normal, MSG_NORMAL, quota.count_abnormal),
        job_abnormal: Some(quota.job_abnormal),
        data: merge_stages([departure_rows, quota_rows]),
    })
}

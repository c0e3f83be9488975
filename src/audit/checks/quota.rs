use serde::Serialize;

use crate::audit::domain::{AnnotatedRecord, AuditStatus, RecordSet};
use crate::audit::flows::config::{QuotaConfig, CATCH_ALL_JOB};

pub(crate) const QUOTA_EXCEEDED: &str =
    "The employer hires more than 10 aliens for different types of work and positions.";

/// Outcome of the job-quota check; carries the over-quota job names so the
/// flow verdict can report which buckets overflowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaOutcome {
    pub status: AuditStatus,
    pub count_abnormal: usize,
    pub job_abnormal: Vec<String>,
    pub records: Vec<AnnotatedRecord>,
}

/// Count applications per configured job bucket and flag every record whose
/// job matches an over-quota bucket.
///
/// Specific buckets match the job description exactly; the "N/A" bucket
/// collects every application whose job is not named by a specific bucket.
/// A bucket overflows when its count is strictly greater than `max_count`.
/// When the catch-all overflows, every distinct job that fell into it joins
/// the over-quota list (the literal "N/A" stays on the list as well).
///
/// Record annotation deliberately uses substring containment against the
/// over-quota names, matching the rule as the registry applies it. A job
/// whose name merely contains an over-quota name is therefore also flagged.
pub fn job_quota(current: &RecordSet, config: &QuotaConfig) -> QuotaOutcome {
    let specific_jobs: Vec<&str> = config
        .buckets
        .iter()
        .map(|bucket| bucket.job.as_str())
        .filter(|job| *job != CATCH_ALL_JOB)
        .collect();

    // Distinct catch-all job names in input order.
    let mut catch_all_jobs: Vec<&str> = Vec::new();
    for record in current.applications() {
        let job = record.job_description.as_str();
        if !specific_jobs.contains(&job) && !catch_all_jobs.contains(&job) {
            catch_all_jobs.push(job);
        }
    }

    let mut job_abnormal: Vec<String> = Vec::new();
    for bucket in &config.buckets {
        let count = if bucket.job == CATCH_ALL_JOB {
            current
                .applications()
                .filter(|record| !specific_jobs.contains(&record.job_description.as_str()))
                .count()
        } else {
            current
                .applications()
                .filter(|record| record.job_description == bucket.job)
                .count()
        };
        if count > bucket.max_count as usize {
            job_abnormal.push(bucket.job.clone());
        }
    }

    if job_abnormal.iter().any(|job| job == CATCH_ALL_JOB) {
        job_abnormal.extend(catch_all_jobs.into_iter().map(str::to_string));
    }

    let records: Vec<AnnotatedRecord> = current
        .iter()
        .map(|record| {
            let over_quota = job_abnormal
                .iter()
                .any(|job| record.job_description.contains(job.as_str()));
            if over_quota {
                AnnotatedRecord::abnormal(record.clone(), QUOTA_EXCEEDED)
            } else {
                AnnotatedRecord::normal(record.clone())
            }
        })
        .collect();

    let count_abnormal = records
        .iter()
        .filter(|annotated| annotated.status.is_abnormal())
        .count();
    let status = if records
        .iter()
        .any(|annotated| annotated.status.is_normal())
    {
        AuditStatus::Normal
    } else {
        AuditStatus::Abnormal
    };

    QuotaOutcome {
        status,
        count_abnormal,
        job_abnormal,
        records,
    }
}

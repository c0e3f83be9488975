use serde::{Deserialize, Serialize};

/// Job name reserved for the catch-all quota bucket.
pub const CATCH_ALL_JOB: &str = "N/A";

/// Configuration problems rejected before any check runs.
#[derive(Debug, thiserror::Error)]
pub enum FlowConfigError {
    #[error("quota configuration must contain exactly one \"N/A\" catch-all bucket")]
    MissingCatchAll,
    #[error("quota configuration contains more than one \"N/A\" catch-all bucket")]
    DuplicateCatchAll,
    #[error("quota configuration lists job {job:?} more than once")]
    DuplicateJob { job: String },
    #[error("relocation window must cover at least one day")]
    EmptyWindow,
}

/// One job category with its maximum allowed headcount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaBucket {
    pub job: String,
    pub max_count: u32,
}

/// Ordered quota buckets for the job-quota flow. Exactly one bucket must be
/// the "N/A" catch-all for job descriptions not listed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaConfig {
    pub buckets: Vec<QuotaBucket>,
}

impl QuotaConfig {
    pub fn new(buckets: Vec<QuotaBucket>) -> Self {
        Self { buckets }
    }

    pub fn validate(&self) -> Result<(), FlowConfigError> {
        let catch_alls = self
            .buckets
            .iter()
            .filter(|bucket| bucket.job == CATCH_ALL_JOB)
            .count();
        match catch_alls {
            0 => return Err(FlowConfigError::MissingCatchAll),
            1 => {}
            _ => return Err(FlowConfigError::DuplicateCatchAll),
        }

        for (index, bucket) in self.buckets.iter().enumerate() {
            if self.buckets[..index]
                .iter()
                .any(|earlier| earlier.job == bucket.job)
            {
                return Err(FlowConfigError::DuplicateJob {
                    job: bucket.job.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Limits for the relocation flows: at most `max_count` moves within any
/// trailing `window_days`-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationConfig {
    pub max_count: u32,
    pub window_days: u32,
}

impl RelocationConfig {
    pub fn validate(&self) -> Result<(), FlowConfigError> {
        if self.window_days == 0 {
            return Err(FlowConfigError::EmptyWindow);
        }
        Ok(())
    }
}

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Serialize, Serializer};

use crate::audit::domain::{AnnotatedRecord, AuditStatus, MasterFormType, Record, RecordSet};

pub(crate) const RELOCATION_EXCEEDED: &str = "Aliens moved to B exceeding the limit of people \
     and have been relocated for more than a specified number of days.";

/// Trailing window for the coarse volume gate.
const COARSE_WINDOW_DAYS: i64 = 90;

/// One day's relocation volume after grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Day span reported by a relocation verdict: "pass" when the batch cleared
/// the gates, otherwise the inclusive day count the flagged volume spanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationSpan {
    Pass,
    Days(i64),
}

impl Serialize for RelocationSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RelocationSpan::Pass => serializer.serialize_str("pass"),
            RelocationSpan::Days(days) => serializer.serialize_i64(*days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelocationOutcome {
    pub status: AuditStatus,
    pub count_abnormal: usize,
    pub total_relocate_day: RelocationSpan,
    pub records: Vec<AnnotatedRecord>,
}

/// What the fine density gate concluded about the narrow window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DensityVerdict {
    /// Narrow-window volume stayed under the limit.
    Under,
    /// Volume at or over the limit, packed into no more days than allowed.
    Packed { total: usize, span: i64 },
    /// Same volume, but spread over a longer span than the limit; tolerated.
    Spread,
}

/// Judge the already-narrowed window: volume first, then density. The span
/// is the inclusive day count between the earliest and latest dates present
/// (`max - min + 1`).
pub(crate) fn density_gate(
    window: &[DailyCount],
    limit_count: u32,
    limit_days: u32,
) -> DensityVerdict {
    let total: usize = window.iter().map(|daily| daily.count).sum();
    if total < limit_count as usize {
        return DensityVerdict::Under;
    }

    let (Some(first), Some(last)) = (
        window.iter().map(|daily| daily.date).min(),
        window.iter().map(|daily| daily.date).max(),
    ) else {
        return DensityVerdict::Under;
    };

    let span = (last - first).num_days() + 1;
    if span <= limit_days as i64 {
        DensityVerdict::Packed { total, span }
    } else {
        DensityVerdict::Spread
    }
}

/// Two-window relocation test: a coarse 90-day volume gate, then a fine
/// `limit_days` density gate.
///
/// `end_date` is the latest date in the aggregate. When the trailing 90-day
/// volume stays within `limit_count` the whole batch is normal. Otherwise
/// the trailing `limit_days`-day window (inclusive, hence the `- 1` on the
/// start date) is judged by [`density_gate`]. All `records` are annotated
/// uniformly with the resulting status; the overall verdict is abnormal
/// only when the flagged volume reaches the size of the record set itself.
///
/// An empty aggregate is a defined no-data outcome: normal, span "pass".
pub fn relocation_window(
    records: &RecordSet,
    daily_counts: &[DailyCount],
    limit_count: u32,
    limit_days: u32,
) -> RelocationOutcome {
    let Some(end_date) = daily_counts.iter().map(|daily| daily.date).max() else {
        return RelocationOutcome {
            status: AuditStatus::Normal,
            count_abnormal: 0,
            total_relocate_day: RelocationSpan::Pass,
            records: records.iter().cloned().map(AnnotatedRecord::normal).collect(),
        };
    };

    let coarse_start = end_date - Duration::days(COARSE_WINDOW_DAYS);
    let coarse_total: usize = daily_counts
        .iter()
        .filter(|daily| daily.date >= coarse_start && daily.date <= end_date)
        .map(|daily| daily.count)
        .sum();

    let mut packed: Option<(usize, i64)> = None;
    if coarse_total > limit_count as usize {
        let narrow_start = end_date - Duration::days(limit_days as i64 - 1);
        let window: Vec<DailyCount> = daily_counts
            .iter()
            .filter(|daily| daily.date >= narrow_start && daily.date <= end_date)
            .copied()
            .collect();
        if let DensityVerdict::Packed { total, span } =
            density_gate(&window, limit_count, limit_days)
        {
            packed = Some((total, span));
        }
    }

    let records: Vec<AnnotatedRecord> = records
        .iter()
        .cloned()
        .map(|record| match packed {
            Some(_) => AnnotatedRecord::abnormal(record, RELOCATION_EXCEEDED),
            None => AnnotatedRecord::normal(record),
        })
        .collect();

    match packed {
        Some((total, span)) if total >= records.len() => RelocationOutcome {
            status: AuditStatus::Abnormal,
            count_abnormal: total,
            total_relocate_day: RelocationSpan::Days(span),
            records,
        },
        Some((total, _)) => RelocationOutcome {
            status: AuditStatus::Normal,
            count_abnormal: total,
            total_relocate_day: RelocationSpan::Pass,
            records,
        },
        None => RelocationOutcome {
            status: AuditStatus::Normal,
            count_abnormal: 0,
            total_relocate_day: RelocationSpan::Pass,
            records,
        },
    }
}

/// Group records into per-day counts keyed by (date, employer, form).
/// Distinct employer/form pairs on the same day stay separate rows, exactly
/// as the window sums expect.
pub fn daily_counts_by_form(records: &RecordSet) -> Vec<DailyCount> {
    let mut grouped: BTreeMap<(NaiveDate, &str, &str), usize> = BTreeMap::new();
    for record in records.iter() {
        *grouped
            .entry((
                record.created_timestamp.date(),
                record.employer_no.as_str(),
                record.form_id.as_str(),
            ))
            .or_default() += 1;
    }
    grouped
        .into_iter()
        .map(|((date, _, _), count)| DailyCount { date, count })
        .collect()
}

/// Join historical exits at employer A with current applications at employer
/// B, aggregate the matched pairs into daily counts keyed by the exit date,
/// and judge the result with [`relocation_window`].
pub fn cross_employer_relocation(
    current: &RecordSet,
    historical: &RecordSet,
    limit_count: u32,
    limit_days: u32,
    employer_a: &str,
    employer_b: &str,
) -> RelocationOutcome {
    let exits: Vec<&Record> = historical
        .iter()
        .filter(|record| {
            record.employer_no == employer_a && record.master_form_type == MasterFormType::Exit
        })
        .collect();
    let applications: Vec<&Record> = current
        .iter()
        .filter(|record| {
            record.employer_no == employer_b
                && record.master_form_type == MasterFormType::Application
        })
        .collect();

    let mut grouped: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for exit in &exits {
        for _application in applications
            .iter()
            .filter(|application| application.alien_id == exit.alien_id)
        {
            *grouped.entry(exit.created_timestamp.date()).or_default() += 1;
        }
    }
    let daily_counts: Vec<DailyCount> = grouped
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    relocation_window(current, &daily_counts, limit_count, limit_days)
}

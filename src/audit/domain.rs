use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Master form classification carried on every permit event.
///
/// The ministry feed uses opaque form-type codes; only the application and
/// departure-report forms drive audit decisions, everything else is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MasterFormType {
    /// "MT_59" — a permit/job application submitted for an alien worker.
    Application,
    /// "MT_13_EXIT" — confirmation that a departure from a prior employer was reported.
    Exit,
    /// Any other form code present in the feed.
    Other(String),
}

impl MasterFormType {
    pub const APPLICATION_CODE: &'static str = "MT_59";
    pub const EXIT_CODE: &'static str = "MT_13_EXIT";

    pub fn from_code(code: &str) -> Self {
        match code {
            Self::APPLICATION_CODE => Self::Application,
            Self::EXIT_CODE => Self::Exit,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            Self::Application => Self::APPLICATION_CODE,
            Self::Exit => Self::EXIT_CODE,
            Self::Other(code) => code,
        }
    }
}

impl Serialize for MasterFormType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_code())
    }
}

impl<'de> Deserialize<'de> for MasterFormType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// One application/permit event as normalized by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub alien_id: String,
    pub employer_no: String,
    pub form_id: String,
    pub job_description: String,
    pub master_form_type: MasterFormType,
    pub created_timestamp: NaiveDateTime,
    #[serde(default)]
    pub valid_until: Option<NaiveDateTime>,
}

/// Ordered, immutable batch of records. Two instances flow through every
/// audit: the current batch under review and the historical ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet(Vec<Record>);

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    /// Records whose master form type is the application form.
    pub fn applications(&self) -> impl Iterator<Item = &Record> {
        self.0
            .iter()
            .filter(|record| record.master_form_type == MasterFormType::Application)
    }

    /// Copy of this set without any record belonging to the given aliens.
    pub fn without_aliens(&self, alien_ids: &BTreeSet<String>) -> RecordSet {
        self.0
            .iter()
            .filter(|record| !alien_ids.contains(&record.alien_id))
            .cloned()
            .collect()
    }

    /// Latest record for one alien: maximum `created_timestamp`, ties broken
    /// by original input order (the earliest of the tied records wins).
    /// `None` when the alien has no records at all.
    pub fn latest_for_alien(&self, alien_id: &str) -> Option<&Record> {
        let mut latest: Option<&Record> = None;
        for record in self.0.iter().filter(|record| record.alien_id == alien_id) {
            match latest {
                Some(current) if record.created_timestamp <= current.created_timestamp => {}
                _ => latest = Some(record),
            }
        }
        latest
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Verdict attached to individual records and to whole check/flow results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Normal,
    Abnormal,
}

impl AuditStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AuditStatus::Normal => "normal",
            AuditStatus::Abnormal => "abnormal",
        }
    }

    pub const fn is_normal(self) -> bool {
        matches!(self, AuditStatus::Normal)
    }

    pub const fn is_abnormal(self) -> bool {
        matches!(self, AuditStatus::Abnormal)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stage-local copy of a record with its derived status. Checks never touch
/// the input sets; every annotation lives on one of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub status: AuditStatus,
    pub abnormal_desc: String,
}

impl AnnotatedRecord {
    pub fn normal(record: Record) -> Self {
        Self {
            record,
            status: AuditStatus::Normal,
            abnormal_desc: "pass".to_string(),
        }
    }

    pub fn abnormal(record: Record, desc: &str) -> Self {
        Self {
            record,
            status: AuditStatus::Abnormal,
            abnormal_desc: desc.to_string(),
        }
    }
}

/// Stage-identifying tag explaining which rule stage produced a row's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaseCode {
    #[serde(rename = "pass")]
    Pass,
    #[serde(rename = "R1/1")]
    R1Stage1,
    #[serde(rename = "R1/2")]
    R1Stage2,
    #[serde(rename = "R2/1")]
    R2Stage1,
    #[serde(rename = "R2/2")]
    R2Stage2,
    #[serde(rename = "R2/3")]
    R2Stage3,
    #[serde(rename = "R4/1")]
    R4Stage1,
    #[serde(rename = "R4/2")]
    R4Stage2,
}

impl CaseCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            CaseCode::Pass => "pass",
            CaseCode::R1Stage1 => "R1/1",
            CaseCode::R1Stage2 => "R1/2",
            CaseCode::R2Stage1 => "R2/1",
            CaseCode::R2Stage2 => "R2/2",
            CaseCode::R2Stage3 => "R2/3",
            CaseCode::R4Stage1 => "R4/1",
            CaseCode::R4Stage2 => "R4/2",
        }
    }
}

impl fmt::Display for CaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final report row: an annotated record stamped with the stage that judged it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub annotated: AnnotatedRecord,
    pub case_code: CaseCode,
}

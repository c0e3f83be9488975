use super::common::{application, exit_report, quota_config, set};
use crate::audit::checks::RelocationSpan;
use crate::audit::domain::{AuditStatus, CaseCode};
use crate::audit::flows::{
    run_cross_employer_flow, run_inbound_relocation_flow, run_job_quota_flow, FlowConfigError,
    QuotaBucket, QuotaConfig, RelocationConfig, CATCH_ALL_JOB,
};

fn relocation_config() -> RelocationConfig {
    RelocationConfig {
        max_count: 20,
        window_days: 14,
    }
}

#[test]
fn quota_config_without_catch_all_is_rejected() {
    let config = QuotaConfig::new(vec![QuotaBucket {
        job: "กรรมกร".to_string(),
        max_count: 10,
    }]);
    let current = set(Vec::new());
    let historical = set(Vec::new());

    let err = run_job_quota_flow(&current, &historical, &config).unwrap_err();
    assert!(matches!(err, FlowConfigError::MissingCatchAll));
}

#[test]
fn quota_config_with_duplicate_bucket_is_rejected() {
    let config = QuotaConfig::new(vec![
        QuotaBucket {
            job: "กรรมกร".to_string(),
            max_count: 10,
        },
        QuotaBucket {
            job: "กรรมกร".to_string(),
            max_count: 5,
        },
        QuotaBucket {
            job: CATCH_ALL_JOB.to_string(),
            max_count: 10,
        },
    ]);
    let current = set(Vec::new());
    let historical = set(Vec::new());

    let err = run_job_quota_flow(&current, &historical, &config).unwrap_err();
    assert!(matches!(err, FlowConfigError::DuplicateJob { .. }));
}

#[test]
fn zero_day_relocation_window_is_rejected() {
    let config = RelocationConfig {
        max_count: 20,
        window_days: 0,
    };
    let current = set(Vec::new());
    let historical = set(Vec::new());

    let err = run_inbound_relocation_flow(&current, &historical, &config).unwrap_err();
    assert!(matches!(err, FlowConfigError::EmptyWindow));
}

#[test]
fn job_quota_flow_stops_on_departure_failure() {
    let current = set(vec![application("A-1", "E-10", "กรรมกร", "2025-03-01 09:00")]);
    let historical = set(Vec::new());

    let result = run_job_quota_flow(&current, &historical, &quota_config()).expect("valid config");
    assert_eq!(result.verdict.status, AuditStatus::Abnormal);
    assert_eq!(result.verdict.count_abnormal, 1);
    assert!(result.job_abnormal.is_none());
    assert!(result
        .data
        .iter()
        .all(|row| row.case_code == CaseCode::R1Stage1));
}

#[test]
fn job_quota_flow_quota_failure_condemns_the_stage_subset() {
    let mut records = Vec::new();
    let mut ledger = Vec::new();
    for index in 0..11 {
        let alien = format!("A-{index}");
        records.push(application(&alien, "E-10", "กรรมกร", "2025-03-01 09:00"));
        ledger.push(exit_report(&alien, "E-09", "2025-02-01 09:00", None));
    }
    let current = set(records);
    let historical = set(ledger);

    let result = run_job_quota_flow(&current, &historical, &quota_config()).expect("valid config");
    assert_eq!(result.verdict.status, AuditStatus::Abnormal);
    assert_eq!(result.verdict.count_abnormal, 11);
    let job_abnormal = result.job_abnormal.expect("quota stage reached");
    assert!(job_abnormal.contains(&"กรรมกร".to_string()));
    assert_eq!(result.data.len(), 11);
    assert!(result.data.iter().all(|row| {
        row.case_code == CaseCode::R1Stage2 && row.annotated.status.is_abnormal()
    }));
}

#[test]
fn cross_employer_flow_stops_on_expiry_failure() {
    let current = set(vec![application("A-1", "E-B", "กรรมกร", "2025-01-01 00:00")]);
    // Latest ledger entry is an exit, but the permit runs out too soon.
    let historical = set(vec![exit_report(
        "A-1",
        "E-A",
        "2024-12-20 00:00",
        Some("2025-01-15 00:00"),
    )]);

    let result =
        run_cross_employer_flow(&current, &historical, &relocation_config(), "E-A", "E-B")
            .expect("valid config");
    assert_eq!(result.verdict.status, AuditStatus::Abnormal);
    assert_eq!(result.verdict.count_abnormal, 1);
    assert_eq!(result.total_relocate_day, None);
    assert!(result
        .data
        .iter()
        .all(|row| row.case_code == CaseCode::R2Stage2));
}

#[test]
fn cross_employer_flow_reports_relocation_breach() {
    let mut records = Vec::new();
    let mut ledger = Vec::new();
    for index in 0..3 {
        let alien = format!("A-{index}");
        records.push(application(&alien, "E-B", "กรรมกร", "2025-06-30 09:00"));
        ledger.push(exit_report(
            &alien,
            "E-A",
            "2025-06-29 09:00",
            Some("2025-12-31 00:00"),
        ));
    }
    let current = set(records);
    let historical = set(ledger);
    let config = RelocationConfig {
        max_count: 2,
        window_days: 5,
    };

    let result = run_cross_employer_flow(&current, &historical, &config, "E-A", "E-B")
        .expect("valid config");
    assert_eq!(result.verdict.status, AuditStatus::Abnormal);
    assert_eq!(result.verdict.count_abnormal, 3);
    assert_eq!(result.total_relocate_day, Some(RelocationSpan::Days(1)));
    assert!(result
        .data
        .iter()
        .all(|row| row.case_code == CaseCode::R2Stage3));
}

#[test]
fn inbound_flow_normal_path_tags_rows_by_status() {
    let current = set(vec![
        application("A-1", "E-B", "กรรมกร", "2025-06-30 09:00"),
        application("A-2", "E-B", "กรรมกร", "2025-06-30 10:00"),
    ]);
    let historical = set(vec![
        exit_report("A-1", "E-A", "2025-06-01 09:00", None),
        exit_report("A-2", "E-A", "2025-06-01 10:00", None),
    ]);

    let result = run_inbound_relocation_flow(&current, &historical, &relocation_config())
        .expect("valid config");
    assert_eq!(result.verdict.status, AuditStatus::Normal);
    assert_eq!(result.total_relocate_day, Some(RelocationSpan::Pass));
    assert!(result
        .data
        .iter()
        .all(|row| row.case_code == CaseCode::Pass || row.case_code == CaseCode::R4Stage2));
    assert!(result
        .data
        .iter()
        .any(|row| row.case_code == CaseCode::Pass));
}

#[test]
fn inbound_flow_flags_packed_relocation_volume() {
    let mut records = Vec::new();
    let mut ledger = Vec::new();
    for index in 0..22 {
        let alien = format!("A-{index}");
        records.push(application(&alien, "E-B", "กรรมกร", "2025-06-30 09:00"));
        ledger.push(exit_report(&alien, "E-A", "2025-05-01 09:00", None));
    }
    let current = set(records);
    let historical = set(ledger);

    let result = run_inbound_relocation_flow(&current, &historical, &relocation_config())
        .expect("valid config");
    assert_eq!(result.verdict.status, AuditStatus::Abnormal);
    assert_eq!(result.verdict.count_abnormal, 22);
    assert_eq!(result.total_relocate_day, Some(RelocationSpan::Days(1)));
    assert!(result
        .data
        .iter()
        .all(|row| row.case_code == CaseCode::R4Stage2));
}

use reimburse_core::{
    cases::{self, Case, CaseInput},
    evaluation, ReimburseError, RuleConstants, RuleEngine,
};

const PUBLIC_CASES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/public_cases_small.json");

fn input(days: i64, miles: f64, receipts: f64) -> CaseInput {
    CaseInput {
        trip_duration_days:    days,
        miles_traveled:        miles,
        total_receipts_amount: receipts,
    }
}

#[test]
fn rule_engine_scores_against_labelled_fixture() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = RuleEngine::new(RuleConstants::reference());
    let cases = cases::load_cases(PUBLIC_CASES).expect("load");
    let report = evaluation::evaluate(&cases, |c| {
        engine.calculate(c.trip_duration_days, c.miles_traveled, c.total_receipts_amount)
    });

    assert_eq!(report.total_cases, 4);
    assert_eq!(report.exact_matches, 1);
    assert_eq!(report.close_matches, 2);
    assert_eq!(report.failed_cases, vec![3]);
    assert_eq!(report.errors.len(), 3);

    // errors 0 + 0.5 + 10 over four cases
    assert!((report.avg_error - 2.625).abs() < 1e-9, "avg {}", report.avg_error);
    assert!((report.score - 262.8).abs() < 1e-9, "score {}", report.score);
    assert!((report.max_error - 10.0).abs() < 1e-9);
    assert_eq!(report.max_error_case.as_ref().map(|c| c.case_num), Some(2));
    assert!(!report.is_perfect());
    assert!((report.exact_pct() - 25.0).abs() < 1e-9);
}

#[test]
fn worst_cases_are_sorted_by_error() {
    let cases = vec![
        Case::new(input(1, 0.0, 0.0), Some(10.0)),
        Case::new(input(1, 0.0, 0.0), Some(40.0)),
        Case::new(input(1, 0.0, 0.0), Some(25.0)),
    ];
    let report = evaluation::evaluate(&cases, |_| Ok(0.0));
    let worst: Vec<usize> = report.worst(2).iter().map(|c| c.case_num).collect();
    assert_eq!(worst, vec![1, 2]);
    assert_eq!(report.worst(10).len(), 3);
}

#[test]
fn calculation_errors_are_counted_not_fatal() {
    let cases = vec![
        Case::new(input(2, 10.0, 10.0), Some(5.0)),
        Case::new(input(2, 10.0, 10.0), Some(5.0)),
    ];
    let report = evaluation::evaluate(&cases, |c| {
        if c.miles_traveled > 0.0 {
            Err(ReimburseError::InvalidConfig { reason: "no".into() })
        } else {
            Ok(0.0)
        }
    });
    assert_eq!(report.failed_cases, vec![0, 1]);
    assert_eq!(report.avg_error, 0.0);
    assert!((report.score - 0.2).abs() < 1e-9);
}

#[test]
fn perfect_run_is_recognised() {
    let cases = vec![Case::new(input(5, 0.0, 0.0), Some(497.66))];
    let engine = RuleEngine::new(RuleConstants::reference());
    let report = evaluation::evaluate(&cases, |c| {
        engine.calculate(c.trip_duration_days, c.miles_traveled, c.total_receipts_amount)
    });
    assert!(report.is_perfect());
    assert_eq!(report.score, 0.0);
    assert!(report.worst(5)[0].error < 0.01);
    assert_eq!(report.max_error, 0.0);
    assert!(report.max_error_case.is_none());
}

#[test]
fn report_serialises_for_error_analysis() {
    let cases = vec![Case::new(input(4, 200.0, 100.0), Some(300.0))];
    let report = evaluation::evaluate(&cases, |_| Ok(310.0));
    let json = serde_json::to_value(&report).expect("serialise");
    assert_eq!(json["errors"][0]["miles_per_day"], 50.0);
    assert_eq!(json["errors"][0]["receipts_per_day"], 25.0);
    assert_eq!(json["total_cases"], 1);
}

//! Scoring harness: runs the calculator over labelled cases and
//! summarises how far it lands from the expected payouts.

use crate::{
    cases::{run_case, Case, CaseInput},
    error::ReimburseResult,
};
use serde::Serialize;

/// Counts as an exact match below this absolute error.
pub const EXACT_TOLERANCE: f64 = 0.01;
/// Counts as a close match below this absolute error.
pub const CLOSE_TOLERANCE: f64 = 1.00;

#[derive(Debug, Clone, Serialize)]
pub struct CaseError {
    pub case_num:         usize,
    pub trip_days:        i64,
    pub miles:            f64,
    pub receipts:         f64,
    pub expected:         f64,
    pub predicted:        f64,
    pub error:            f64,
    pub miles_per_day:    f64,
    pub receipts_per_day: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub total_cases:    usize,
    pub exact_matches:  usize,
    pub close_matches:  usize,
    /// Summed error over `total_cases`, failed cases included.
    pub avg_error:      f64,
    pub max_error:      f64,
    pub max_error_case: Option<CaseError>,
    /// `avg_error * 100 + (total - exact) * 0.1`; lower is better.
    pub score:          f64,
    pub errors:         Vec<CaseError>,
    /// Zero-based indices of cases that could not be scored.
    pub failed_cases:   Vec<usize>,
}

impl EvaluationReport {
    pub fn exact_pct(&self) -> f64 {
        pct(self.exact_matches, self.total_cases)
    }

    pub fn close_pct(&self) -> f64 {
        pct(self.close_matches, self.total_cases)
    }

    pub fn is_perfect(&self) -> bool {
        self.total_cases > 0 && self.exact_matches == self.total_cases
    }

    /// The `n` largest errors, largest first.
    pub fn worst(&self, n: usize) -> Vec<&CaseError> {
        let mut sorted: Vec<&CaseError> = self.errors.iter().collect();
        sorted.sort_by(|a, b| b.error.total_cmp(&a.error));
        sorted.truncate(n);
        sorted
    }
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn evaluate<F>(cases: &[Case], calc: F) -> EvaluationReport
where
    F: Fn(&CaseInput) -> ReimburseResult<f64>,
{
    let mut errors = Vec::with_capacity(cases.len());
    let mut failed_cases = Vec::new();
    let mut exact_matches = 0;
    let mut close_matches = 0;
    let mut total_error = 0.0;
    let mut max_error_case: Option<CaseError> = None;

    for (i, case) in cases.iter().enumerate() {
        if i % 100 == 0 {
            log::info!("evaluation: {i}/{} cases processed", cases.len());
        }

        let (input, expected) = match (&case.input, case.expected) {
            (Ok(input), Some(expected)) => (input, expected),
            _ => {
                log::warn!("case={i} evaluation: no usable input/expected pair");
                failed_cases.push(i);
                continue;
            }
        };

        let Some(predicted) = run_case(i, case, &calc).amount() else {
            failed_cases.push(i);
            continue;
        };

        let error = (predicted - expected).abs();
        total_error += error;
        if error < EXACT_TOLERANCE {
            exact_matches += 1;
        }
        if error < CLOSE_TOLERANCE {
            close_matches += 1;
        }

        let days = input.trip_duration_days as f64;
        let record = CaseError {
            case_num: i,
            trip_days: input.trip_duration_days,
            miles: input.miles_traveled,
            receipts: input.total_receipts_amount,
            expected,
            predicted,
            error,
            miles_per_day: input.miles_traveled / days,
            receipts_per_day: input.total_receipts_amount / days,
        };

        if error > max_error_case.as_ref().map_or(0.0, |m| m.error) {
            max_error_case = Some(record.clone());
        }
        errors.push(record);
    }

    let total_cases = cases.len();
    let avg_error = if total_cases == 0 { 0.0 } else { total_error / total_cases as f64 };
    let score = avg_error * 100.0 + (total_cases - exact_matches) as f64 * 0.1;

    EvaluationReport {
        total_cases,
        exact_matches,
        close_matches,
        avg_error,
        max_error: max_error_case.as_ref().map_or(0.0, |m| m.error),
        max_error_case,
        score,
        errors,
        failed_cases,
    }
}

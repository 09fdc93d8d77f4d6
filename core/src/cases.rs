//! Case files and batch processing.
//!
//! Two shapes of case file are accepted, both JSON arrays:
//!   - unlabelled: `{"trip_duration_days", "miles_traveled", "total_receipts_amount"}`
//!   - labelled:   `{"input": {...}, "expected_output": 123.45}`
//!
//! RULE: one malformed or failing record never aborts a batch. Output
//! always has exactly one line per input record.

use crate::error::{ReimburseError, ReimburseResult};
use serde::{Deserialize, Serialize};
use std::{fmt, io::Write, path::Path};

/// Written in place of an amount when a record cannot be computed.
pub const ERROR_SENTINEL: &str = "ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    pub trip_duration_days:    i64,
    pub miles_traveled:        f64,
    pub total_receipts_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CaseRecord {
    Labelled { input: CaseInput, expected_output: f64 },
    Plain(CaseInput),
}

#[derive(Debug, Clone)]
pub struct Case {
    /// Parse failures are kept so the record still occupies its slot.
    pub input:    Result<CaseInput, String>,
    pub expected: Option<f64>,
}

impl Case {
    pub fn new(input: CaseInput, expected: Option<f64>) -> Self {
        Self { input: Ok(input), expected }
    }
}

pub fn load_cases(path: impl AsRef<Path>) -> ReimburseResult<Vec<Case>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&content)?;

    let cases: Vec<Case> = records
        .into_iter()
        .enumerate()
        .map(|(i, value)| match serde_json::from_value::<CaseRecord>(value) {
            Ok(CaseRecord::Labelled { input, expected_output }) => {
                Case::new(input, Some(expected_output))
            }
            Ok(CaseRecord::Plain(input)) => Case::new(input, None),
            Err(e) => {
                log::warn!("cases: record {i} in {} is malformed: {e}", path.display());
                Case { input: Err(e.to_string()), expected: None }
            }
        })
        .collect();

    log::debug!("cases: loaded {} records from {}", cases.len(), path.display());
    Ok(cases)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Amount(f64),
    Failed { reason: String },
}

impl CaseOutcome {
    pub fn amount(&self) -> Option<f64> {
        match self {
            CaseOutcome::Amount(v) => Some(*v),
            CaseOutcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseOutcome::Amount(v) => write!(f, "{v:.2}"),
            CaseOutcome::Failed { .. } => f.write_str(ERROR_SENTINEL),
        }
    }
}

/// Run one record, turning any failure into `CaseOutcome::Failed`.
pub fn run_case<F>(index: usize, case: &Case, calc: &F) -> CaseOutcome
where
    F: Fn(&CaseInput) -> ReimburseResult<f64>,
{
    let result = match &case.input {
        Ok(input) => calc(input).map_err(|e| e.to_string()),
        Err(parse) => Err(parse.clone()),
    };
    match result {
        Ok(amount) => CaseOutcome::Amount(amount),
        Err(reason) => {
            log::warn!("case={} batch: failed: {reason}", index + 1);
            CaseOutcome::Failed { reason }
        }
    }
}

pub fn run_batch<F>(cases: &[Case], calc: F) -> Vec<CaseOutcome>
where
    F: Fn(&CaseInput) -> ReimburseResult<f64>,
{
    let outcomes: Vec<CaseOutcome> = cases
        .iter()
        .enumerate()
        .map(|(i, case)| {
            if (i + 1) % 100 == 0 {
                log::info!("batch: {}/{} records", i + 1, cases.len());
            }
            run_case(i, case, &calc)
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.amount().is_none()).count();
    log::info!("batch: {} records, {failed} failed", outcomes.len());
    outcomes
}

pub fn write_results(path: impl AsRef<Path>, outcomes: &[CaseOutcome]) -> ReimburseResult<()> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut out = std::io::BufWriter::new(file);
    for outcome in outcomes {
        writeln!(out, "{outcome}")?;
    }
    out.flush().map_err(ReimburseError::from)
}

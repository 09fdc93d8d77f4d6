//! Rule stage trait and trace records.
//!
//! RULE: Every step of the rule engine implements RuleStage.
//! A stage maps the running total to a new running total and may read
//! only the trip and the constants table. Execution order is fixed and
//! documented in rule_engine.rs.

use crate::{config::RuleConstants, types::TripInput};
use serde::Serialize;

/// The contract every rule stage must fulfil.
pub trait RuleStage: Send + Sync {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// Return the running total after this stage.
    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64;
}

/// One applied stage, as seen by `RuleEngine::explain`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecord {
    pub stage:  &'static str,
    pub before: f64,
    pub after:  f64,
}

impl StageRecord {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleTrace {
    pub trip:   TripInput,
    pub stages: Vec<StageRecord>,
    /// Final running total rounded to cents.
    pub total:  f64,
}

impl RuleTrace {
    pub fn stage(&self, name: &str) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.stage == name)
    }

    /// Running total immediately before the named stage ran.
    pub fn total_before(&self, name: &str) -> Option<f64> {
        self.stage(name).map(|s| s.before)
    }
}

//! Trip reimbursement calculator.
//!
//! A hand-tuned rule engine reproduces the legacy payout formula; a
//! trained point estimator is consulted and blended in where the two
//! disagree badly. See `rule_engine` for the fixed stage order.

pub mod blend;
pub mod calculator;
pub mod cases;
pub mod config;
pub mod duration;
pub mod efficiency;
pub mod error;
pub mod evaluation;
pub mod mileage;
pub mod predictor;
pub mod receipts;
pub mod rule_engine;
pub mod special_cases;
pub mod stage;
pub mod tiers;
pub mod types;

pub use blend::BlendReconciler;
pub use calculator::HybridCalculator;
pub use config::{BlendConfig, CalculatorConfig, RuleConstants};
pub use error::{ReimburseError, ReimburseResult};
pub use predictor::{ForestModel, Predictor};
pub use rule_engine::RuleEngine;
pub use types::TripInput;

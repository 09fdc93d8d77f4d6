//! Blend reconciler.
//!
//! The rule estimate stands unless the model disagrees by more than the
//! threshold; then the result moves `weight` of the way toward the model.

use crate::{config::BlendConfig, types::round_cents};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendDecision {
    Kept,
    Shifted,
}

#[derive(Debug, Clone, Copy)]
pub struct BlendReconciler {
    config: BlendConfig,
}

impl BlendReconciler {
    pub fn new(config: BlendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    pub fn decide(&self, rule_estimate: f64, model_estimate: f64) -> BlendDecision {
        if (rule_estimate - model_estimate).abs() > self.config.threshold {
            BlendDecision::Shifted
        } else {
            BlendDecision::Kept
        }
    }

    /// Reconciled amount, rounded to cents.
    pub fn reconcile(&self, rule_estimate: f64, model_estimate: f64) -> f64 {
        let blended = match self.decide(rule_estimate, model_estimate) {
            BlendDecision::Kept => rule_estimate,
            BlendDecision::Shifted => {
                rule_estimate + self.config.weight * (model_estimate - rule_estimate)
            }
        };
        round_cents(blended)
    }
}

//! Hybrid calculator: rule engine reconciled against a trained model.

use crate::{
    blend::{BlendDecision, BlendReconciler},
    config::CalculatorConfig,
    error::ReimburseResult,
    predictor::Predictor,
    rule_engine::RuleEngine,
    types::TripInput,
};

/// Both estimates and the final amount for one trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub rule:     f64,
    pub model:    f64,
    pub decision: BlendDecision,
    pub amount:   f64,
}

pub struct HybridCalculator {
    rules:      RuleEngine,
    reconciler: BlendReconciler,
    predictor:  Box<dyn Predictor>,
}

impl HybridCalculator {
    pub fn new(config: CalculatorConfig, predictor: Box<dyn Predictor>) -> Self {
        Self {
            rules:      RuleEngine::new(config.rules),
            reconciler: BlendReconciler::new(config.blend),
            predictor,
        }
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn reconciler(&self) -> &BlendReconciler {
        &self.reconciler
    }

    /// Final reimbursement amount, rounded to cents.
    pub fn calculate(&self, days: i64, miles: f64, receipts: f64) -> ReimburseResult<f64> {
        let trip = TripInput::new(days, miles, receipts)?;
        Ok(self.estimate(&trip).amount)
    }

    /// Rule engine amount alone; the model is never consulted.
    pub fn rule_estimate(&self, days: i64, miles: f64, receipts: f64) -> ReimburseResult<f64> {
        self.rules.calculate(days, miles, receipts)
    }

    pub fn estimate(&self, trip: &TripInput) -> Estimate {
        let rule = self.rules.compute(trip);
        let model = self.predictor.predict(trip);
        let decision = self.reconciler.decide(rule, model);
        let amount = self.reconciler.reconcile(rule, model);
        log::debug!(
            "days={} miles={} receipts={} calculator: rule={rule:.2} model={model:.2} {decision:?} -> {amount:.2}",
            trip.days,
            trip.miles,
            trip.receipts
        );
        Estimate { rule, model, decision, amount }
    }
}

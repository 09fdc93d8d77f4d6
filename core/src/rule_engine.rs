//! The rule engine — the deterministic half of the calculator.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Base pay             (duration damping x daily base x days)
//!   2. Mileage tier
//!   3. Receipt curve
//!   4. Efficiency bonus
//!   5. Five-day bonus + cap
//!   6. Road-warrior bonus   (one day, long distance)
//!   7. Low-mileage clawback (3-4 days, short hops)
//!   8. Fortnight parity
//!   9. Legacy cents bug     (multiplies everything above)
//!
//! RULES:
//!   - Stages 1-4 are additive and form the base total.
//!   - Stage 5 caps before any later stage adds or scales.
//!   - The result is rounded to cents once, after stage 9.

use crate::{
    config::RuleConstants,
    duration::BasePay,
    efficiency::EfficiencyBonus,
    error::ReimburseResult,
    mileage::MileageTier,
    receipts::ReceiptCurve,
    special_cases::{
        FiveDayBonus, FortnightParity, LegacyCentsBug, LowMileageClawback, RoadWarriorBonus,
    },
    stage::{RuleStage, RuleTrace, StageRecord},
    types::{round_cents, TripInput},
};

pub struct RuleEngine {
    constants: RuleConstants,
    stages:    Vec<Box<dyn RuleStage>>,
}

impl RuleEngine {
    pub fn new(constants: RuleConstants) -> Self {
        let mut engine = Self { constants, stages: Vec::new() };

        // EXECUTION ORDER — fixed, documented, never reordered.
        engine.register(Box::new(BasePay));
        engine.register(Box::new(MileageTier));
        engine.register(Box::new(ReceiptCurve));
        engine.register(Box::new(EfficiencyBonus));
        engine.register(Box::new(FiveDayBonus));
        engine.register(Box::new(RoadWarriorBonus));
        engine.register(Box::new(LowMileageClawback));
        engine.register(Box::new(FortnightParity));
        engine.register(Box::new(LegacyCentsBug));
        engine
    }

    fn register(&mut self, stage: Box<dyn RuleStage>) {
        self.stages.push(stage);
    }

    pub fn constants(&self) -> &RuleConstants {
        &self.constants
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Validate raw inputs, then compute.
    pub fn calculate(&self, days: i64, miles: f64, receipts: f64) -> ReimburseResult<f64> {
        let trip = TripInput::new(days, miles, receipts)?;
        Ok(self.compute(&trip))
    }

    /// Rule estimate for one trip, rounded to cents.
    pub fn compute(&self, trip: &TripInput) -> f64 {
        let total = self.run(trip, |_| {});
        let rounded = round_cents(total);
        log::trace!(
            "days={} miles={} receipts={} rule_engine: estimate={rounded:.2}",
            trip.days,
            trip.miles,
            trip.receipts
        );
        rounded
    }

    /// Same computation as `compute`, recording each stage's effect.
    pub fn explain(&self, trip: &TripInput) -> RuleTrace {
        let mut stages = Vec::with_capacity(self.stages.len());
        let total = self.run(trip, |record| stages.push(record));
        RuleTrace {
            trip:  *trip,
            stages,
            total: round_cents(total),
        }
    }

    fn run(&self, trip: &TripInput, mut observe: impl FnMut(StageRecord)) -> f64 {
        self.stages.iter().fold(0.0, |before, stage| {
            let after = stage.apply(&self.constants, trip, before);
            observe(StageRecord { stage: stage.name(), before, after });
            after
        })
    }
}

//! Receipt curve.
//!
//! Short and mid trips reimburse receipts on a two-rate curve with a knee
//! that scales with trip length. Long trips use a three-term curve: a base
//! rate up to the knee, a spill rate up to twice the knee, and a per-day
//! growing penalty on everything past that. The long curve has no floor
//! and goes negative for very high spend on a short-ish long trip.

use crate::{
    config::{LongReceiptConfig, ReceiptConfig, ReceiptCurveConfig, RuleConstants},
    stage::RuleStage,
    types::{Days, TripInput},
};

pub fn rec_comp(receipts_cfg: &ReceiptConfig, days: Days, receipts: f64) -> f64 {
    if days <= receipts_cfg.short.max_days {
        two_rate(&receipts_cfg.short, days, receipts)
    } else if days <= receipts_cfg.mid.max_days {
        two_rate(&receipts_cfg.mid, days, receipts)
    } else {
        long_trip(&receipts_cfg.long, days, receipts)
    }
}

fn two_rate(curve: &ReceiptCurveConfig, days: Days, receipts: f64) -> f64 {
    let knee = curve.knee_per_day * f64::from(days);
    if receipts <= knee {
        curve.low_rate * receipts
    } else {
        curve.low_rate * knee + curve.high_rate * (receipts - knee)
    }
}

fn long_trip(curve: &LongReceiptConfig, days: Days, receipts: f64) -> f64 {
    let days = f64::from(days);
    let knee = curve.knee_per_day * days;
    let base = curve.base_rate * receipts.min(knee);
    let spill = curve.spill_rate * (receipts - knee).min(knee).max(0.0);
    let penalty_rate = curve.penalty_base + curve.penalty_slope * days;
    let penalty = penalty_rate * (receipts - 2.0 * knee).max(0.0);
    base + spill - penalty
}

pub struct ReceiptCurve;

impl RuleStage for ReceiptCurve {
    fn name(&self) -> &'static str { "receipt_curve" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        total + rec_comp(&constants.receipts, trip.days, trip.receipts)
    }
}

//! Duration damping: long trips earn a shrinking per-day base.

use crate::{
    config::{DampingConfig, RuleConstants},
    stage::RuleStage,
    types::{Days, TripInput},
};

/// Multiplier on the daily base. 1.0 up to `free_days`, then
/// `1 - k * ln(days - (free_days - 1))` clamped so base pay never turns
/// negative. With the reference seven free days the offset is six.
pub fn long_fac(damping: &DampingConfig, days: Days) -> f64 {
    if days <= damping.free_days {
        return 1.0;
    }
    let over = f64::from(days - (damping.free_days - 1));
    (1.0 - damping.long_trip_k * over.ln()).max(0.0)
}

/// Damped daily base pay for the whole trip.
pub fn base_pay(constants: &RuleConstants, days: Days) -> f64 {
    constants.base_daily_rate * f64::from(days) * long_fac(&constants.damping, days)
}

pub struct BasePay;

impl RuleStage for BasePay {
    fn name(&self) -> &'static str { "base_pay" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        total + base_pay(constants, trip.days)
    }
}

//! Efficiency bonus: a parabola in miles-per-day.

use crate::{
    config::{EfficiencyConfig, RuleConstants},
    stage::RuleStage,
    types::{Days, TripInput},
};

/// `(1 - ((mpd - peak) / width)^2) * bonus`. Short trips are floored at
/// zero; long trips keep the negative tail as a penalty.
pub fn eff_bonus(efficiency: &EfficiencyConfig, days: Days, miles: f64) -> f64 {
    eff_bonus_at(efficiency, days, miles / f64::from(days))
}

fn eff_bonus_at(efficiency: &EfficiencyConfig, days: Days, mpd: f64) -> f64 {
    let score = 1.0 - ((mpd - efficiency.peak_mpd) / efficiency.width_mpd).powi(2);
    if days >= efficiency.long_from_days {
        score * efficiency.long_bonus
    } else {
        (score * efficiency.short_bonus).max(0.0)
    }
}

pub struct EfficiencyBonus;

impl RuleStage for EfficiencyBonus {
    fn name(&self) -> &'static str { "efficiency_bonus" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        total + eff_bonus_at(&constants.efficiency, trip.days, trip.miles_per_day())
    }
}

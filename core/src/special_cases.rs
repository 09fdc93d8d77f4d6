//! Special-case adjustments.
//!
//! Applied after the base total is formed, in the order listed in
//! rule_engine.rs. The five-day cap must run before every later stage
//! so that the bonuses and the cents multiplier act on the capped total.

use crate::{
    config::{RuleConstants, SpecialCaseConfig},
    stage::RuleStage,
    types::TripInput,
};

/// Five-day trips get a flat bonus, then the running total is capped.
pub struct FiveDayBonus;

impl RuleStage for FiveDayBonus {
    fn name(&self) -> &'static str { "five_day_bonus" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        let s = &constants.special;
        if trip.days != 5 {
            return total;
        }
        (total + s.five_day_bonus).min(s.five_day_cap)
    }
}

/// Single-day trips covering a long distance.
pub struct RoadWarriorBonus;

impl RuleStage for RoadWarriorBonus {
    fn name(&self) -> &'static str { "road_warrior_bonus" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        let s = &constants.special;
        if trip.days == 1 && trip.miles > s.one_day_min_miles {
            total + s.one_day_bonus
        } else {
            total
        }
    }
}

/// Amount clawed back from a trip that barely drove but spent heavily.
pub fn low_mileage_clawback(special: &SpecialCaseConfig, trip: &TripInput) -> f64 {
    if !special.low_mileage_days.contains(&trip.days) || trip.miles > special.low_mileage_max_miles {
        return 0.0;
    }
    let cap = special.low_mileage_cap_per_day * trip.days_f64();
    special.low_mileage_rate * (trip.receipts - cap).max(0.0)
}

pub struct LowMileageClawback;

impl RuleStage for LowMileageClawback {
    fn name(&self) -> &'static str { "low_mileage_clawback" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        total - low_mileage_clawback(&constants.special, trip)
    }
}

/// Week-one bonus or week-two penalty, keyed on receipts per day.
pub fn parity_adjustment(special: &SpecialCaseConfig, trip: &TripInput) -> f64 {
    let rpd = trip.receipts_per_day();
    if special.week_window.contains(trip.days, rpd) {
        special.week_bonus
    } else if special.fortnight_window.contains(trip.days, rpd) {
        -special.fortnight_penalty
    } else {
        0.0
    }
}

pub struct FortnightParity;

impl RuleStage for FortnightParity {
    fn name(&self) -> &'static str { "fortnight_parity" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        total + parity_adjustment(&constants.special, trip)
    }
}

/// True when the receipt total, rounded to cents, ends in one of the
/// configured cent values. Legacy quirk: these payouts are scaled down.
pub fn hits_cents_bug(special: &SpecialCaseConfig, receipts: f64) -> bool {
    let cents = (receipts * 100.0).round_ties_even() % 100.0;
    special.bug_cents.iter().any(|c| f64::from(*c) == cents)
}

pub struct LegacyCentsBug;

impl RuleStage for LegacyCentsBug {
    fn name(&self) -> &'static str { "legacy_cents_bug" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        let s = &constants.special;
        if hits_cents_bug(s, trip.receipts) {
            log::trace!(
                "receipts={:.2} special_cases: cents bug scales {total:.2} by {}",
                trip.receipts,
                s.bug_factor
            );
            total * s.bug_factor
        } else {
            total
        }
    }
}

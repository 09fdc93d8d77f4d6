//! Mileage tier adjustment.
//!
//! Two tables: trips at or below the short-hop distance are keyed by
//! day count (short hops are mildly penalised, less so on longer trips);
//! everything else is keyed by miles. The miles table is non-monotonic
//! (dips negative, then climbs) because it was fitted to observed payouts.

use crate::{
    config::{MileageConfig, RuleConstants},
    stage::RuleStage,
    tiers,
    types::{Days, TripInput},
};

pub fn mile_delta(mileage: &MileageConfig, days: Days, miles: f64) -> f64 {
    if miles <= mileage.short_hop_miles {
        tiers::lookup(&mileage.short_hop_bands, f64::from(days), mileage.short_hop_fallback)
    } else {
        tiers::lookup(&mileage.bands, miles, mileage.fallback)
    }
}

pub struct MileageTier;

impl RuleStage for MileageTier {
    fn name(&self) -> &'static str { "mileage_tier" }

    fn apply(&self, constants: &RuleConstants, trip: &TripInput, total: f64) -> f64 {
        total + mile_delta(&constants.mileage, trip.days, trip.miles)
    }
}

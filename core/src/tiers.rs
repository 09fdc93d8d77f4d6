//! Ordered band tables.
//!
//! RULE: every stepwise lookup in the rule engine goes through
//! [`lookup`]. Bands are scanned in order and the first band whose
//! inclusive upper bound covers the input wins, so a table may be
//! non-monotonic in its values but never in its bounds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Inclusive upper bound of the band.
    pub upto:  f64,
    pub value: f64,
}

impl Band {
    pub const fn new(upto: f64, value: f64) -> Self {
        Self { upto, value }
    }
}

/// Value of the first band with `x <= upto`, or `fallback` when `x`
/// lies beyond every band.
pub fn lookup(bands: &[Band], x: f64, fallback: f64) -> f64 {
    bands
        .iter()
        .find(|band| x <= band.upto)
        .map(|band| band.value)
        .unwrap_or(fallback)
}

/// True when the band bounds are finite and strictly increasing.
pub fn is_ordered(bands: &[Band]) -> bool {
    bands.iter().all(|b| b.upto.is_finite() && b.value.is_finite())
        && bands.windows(2).all(|w| w[0].upto < w[1].upto)
}

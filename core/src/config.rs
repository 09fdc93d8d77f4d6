use crate::{
    error::{ReimburseError, ReimburseResult},
    tiers::{self, Band},
    types::Days,
};
use serde::{Deserialize, Serialize};

// ── Duration damping ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DampingConfig {
    /// Coefficient on ln(days - (free_days - 1)) once a trip passes `free_days`.
    pub long_trip_k: f64,
    /// Longest trip that still earns the full daily base.
    pub free_days:   Days,
}

// ── Mileage tiers ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MileageConfig {
    /// Trips at or below this distance use the day-keyed short-hop table.
    pub short_hop_miles:    f64,
    /// Keyed by day count.
    pub short_hop_bands:    Vec<Band>,
    pub short_hop_fallback: f64,
    /// Keyed by miles.
    pub bands:              Vec<Band>,
    pub fallback:           f64,
}

// ── Receipt curves ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptCurveConfig {
    /// Last day count this curve applies to.
    pub max_days:     Days,
    pub low_rate:     f64,
    pub high_rate:    f64,
    pub knee_per_day: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongReceiptConfig {
    pub base_rate:     f64,
    pub spill_rate:    f64,
    pub knee_per_day:  f64,
    pub penalty_base:  f64,
    /// Added to `penalty_base` once per trip day.
    pub penalty_slope: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    pub short: ReceiptCurveConfig,
    pub mid:   ReceiptCurveConfig,
    pub long:  LongReceiptConfig,
}

// ── Efficiency parabola ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyConfig {
    pub peak_mpd:       f64,
    pub width_mpd:      f64,
    pub short_bonus:    f64,
    pub long_bonus:     f64,
    /// First day count that may score negative.
    pub long_from_days: Days,
}

// ── Special cases ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParityWindow {
    pub min_days: Days,
    pub max_days: Days,
    pub min_rpd:  f64,
    pub max_rpd:  f64,
}

impl ParityWindow {
    pub fn contains(&self, days: Days, receipts_per_day: f64) -> bool {
        (self.min_days..=self.max_days).contains(&days)
            && (self.min_rpd..=self.max_rpd).contains(&receipts_per_day)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialCaseConfig {
    pub five_day_bonus:          f64,
    pub five_day_cap:            f64,
    pub one_day_min_miles:       f64,
    pub one_day_bonus:           f64,
    pub low_mileage_days:        Vec<Days>,
    pub low_mileage_max_miles:   f64,
    pub low_mileage_cap_per_day: f64,
    pub low_mileage_rate:        f64,
    pub week_window:             ParityWindow,
    pub week_bonus:              f64,
    pub fortnight_window:        ParityWindow,
    /// Subtracted, so stored positive.
    pub fortnight_penalty:       f64,
    pub bug_factor:              f64,
    /// Cent values (0..100) of the receipt total that trigger `bug_factor`.
    pub bug_cents:               Vec<u32>,
}

// ── Constants table ────────────────────────────────────────────────

/// Every numeric parameter of the rule engine. Built once, shared by
/// reference, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConstants {
    pub base_daily_rate: f64,
    pub damping:         DampingConfig,
    pub mileage:         MileageConfig,
    pub receipts:        ReceiptConfig,
    pub efficiency:      EfficiencyConfig,
    pub special:         SpecialCaseConfig,
}

impl RuleConstants {
    /// Load from `{data_dir}/rules/rule_constants.json`.
    /// In tests, use RuleConstants::reference().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/rules/rule_constants.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let constants: RuleConstants = serde_json::from_str(&content)?;
        constants.validate()?;
        log::debug!("config: loaded rule constants from {path}");
        Ok(constants)
    }

    /// The hand-tuned values the legacy system was fitted to.
    pub fn reference() -> Self {
        Self {
            base_daily_rate: 97.2,
            damping: DampingConfig {
                long_trip_k: 0.111,
                free_days:   7,
            },
            mileage: MileageConfig {
                short_hop_miles: 100.0,
                short_hop_bands: vec![
                    Band::new(1.0, 0.0),
                    Band::new(3.0, -150.0),
                    Band::new(6.0, -100.0),
                ],
                short_hop_fallback: -50.0,
                bands: vec![
                    Band::new(100.0, -261.0),
                    Band::new(300.0, -25.0),
                    Band::new(600.0, 21.0),
                    Band::new(1_000.0, 254.0),
                ],
                fallback: 314.0,
            },
            receipts: ReceiptConfig {
                short: ReceiptCurveConfig {
                    max_days:     2,
                    low_rate:     0.60,
                    high_rate:    0.15,
                    knee_per_day: 1_000.0,
                },
                mid: ReceiptCurveConfig {
                    max_days:     6,
                    low_rate:     0.45,
                    high_rate:    0.15,
                    knee_per_day: 1_000.0,
                },
                long: LongReceiptConfig {
                    base_rate:     0.45,
                    spill_rate:    0.15,
                    knee_per_day:  150.0,
                    penalty_base:  0.25,
                    penalty_slope: 0.02,
                },
            },
            efficiency: EfficiencyConfig {
                peak_mpd:       200.0,
                width_mpd:      260.0,
                short_bonus:    80.0,
                long_bonus:     80.0,
                long_from_days: 7,
            },
            special: SpecialCaseConfig {
                five_day_bonus:          79.0,
                five_day_cap:            1_720.0,
                one_day_min_miles:       500.0,
                one_day_bonus:           235.0,
                low_mileage_days:        vec![3, 4],
                low_mileage_max_miles:   100.0,
                low_mileage_cap_per_day: 900.0,
                low_mileage_rate:        0.90,
                week_window: ParityWindow {
                    min_days: 7,
                    max_days: 8,
                    min_rpd:  120.0,
                    max_rpd:  180.0,
                },
                week_bonus: 280.0,
                fortnight_window: ParityWindow {
                    min_days: 13,
                    max_days: 14,
                    min_rpd:  150.0,
                    max_rpd:  200.0,
                },
                fortnight_penalty: 370.0,
                bug_factor:        0.60,
                bug_cents:         vec![49, 99],
            },
        }
    }

    pub fn validate(&self) -> ReimburseResult<()> {
        let m = &self.mileage;
        if !tiers::is_ordered(&m.short_hop_bands) || !tiers::is_ordered(&m.bands) {
            return Err(invalid("mileage bands must have strictly increasing finite bounds"));
        }
        let r = &self.receipts;
        if r.short.max_days >= r.mid.max_days {
            return Err(invalid("short receipt curve must end before the mid curve"));
        }
        if self.efficiency.width_mpd <= 0.0 {
            return Err(invalid("efficiency width must be positive"));
        }
        if self.damping.free_days == 0 {
            // The damping offset is free_days - 1.
            return Err(invalid("damping must leave at least one undamped day"));
        }
        if let Some(c) = self.special.bug_cents.iter().find(|c| **c >= 100) {
            return Err(invalid(&format!("bug cent value {c} is not below 100")));
        }
        Ok(())
    }
}

// ── Blend ──────────────────────────────────────────────────────────

/// Reconciliation parameters. The legacy write-up quotes 350 / 0.8 while
/// the legacy code runs 100 / 0.9; the defaults follow the code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendConfig {
    /// Absolute disagreement above which the model estimate is blended in.
    pub threshold: f64,
    /// Fraction of the gap to close, in (0, 1].
    pub weight:    f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self { threshold: 100.0, weight: 0.9 }
    }
}

impl BlendConfig {
    /// Load from `{data_dir}/blend/blend_config.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/blend/blend_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let blend: BlendConfig = serde_json::from_str(&content)?;
        blend.validate()?;
        log::debug!(
            "config: blend threshold={} weight={} from {path}",
            blend.threshold,
            blend.weight
        );
        Ok(blend)
    }

    pub fn validate(&self) -> ReimburseResult<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(invalid(&format!(
                "blend threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        if !(self.weight > 0.0 && self.weight <= 1.0) {
            return Err(invalid(&format!(
                "blend weight must lie in (0, 1], got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

// ── Calculator ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    pub rules: RuleConstants,
    pub blend: BlendConfig,
}

impl CalculatorConfig {
    /// Load from the data/ directory.
    /// In tests, use CalculatorConfig::reference().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        Ok(Self {
            rules: RuleConstants::load(data_dir)?,
            blend: BlendConfig::load(data_dir)?,
        })
    }

    pub fn reference() -> Self {
        Self {
            rules: RuleConstants::reference(),
            blend: BlendConfig::default(),
        }
    }
}

fn invalid(reason: &str) -> ReimburseError {
    ReimburseError::InvalidConfig { reason: reason.to_string() }
}

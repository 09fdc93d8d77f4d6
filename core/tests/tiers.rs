use reimburse_core::{
    duration::long_fac,
    efficiency::eff_bonus,
    mileage::mile_delta,
    receipts::rec_comp,
    tiers::{self, Band},
    RuleConstants,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn band_lookup_takes_first_covering_band() {
    let bands = [Band::new(10.0, 1.0), Band::new(20.0, -5.0), Band::new(30.0, 7.0)];
    assert_eq!(tiers::lookup(&bands, 0.0, 99.0), 1.0);
    assert_eq!(tiers::lookup(&bands, 10.0, 99.0), 1.0);
    assert_eq!(tiers::lookup(&bands, 10.5, 99.0), -5.0);
    assert_eq!(tiers::lookup(&bands, 30.0, 99.0), 7.0);
    assert_eq!(tiers::lookup(&bands, 30.01, 99.0), 99.0);
    assert_eq!(tiers::lookup(&[], 1.0, 42.0), 42.0);
}

#[test]
fn band_order_check() {
    assert!(tiers::is_ordered(&[Band::new(1.0, 0.0), Band::new(2.0, 0.0)]));
    assert!(!tiers::is_ordered(&[Band::new(2.0, 0.0), Band::new(2.0, 0.0)]));
    assert!(!tiers::is_ordered(&[Band::new(f64::INFINITY, 0.0)]));
}

#[test]
fn damping_starts_after_a_week_and_never_goes_negative() {
    let c = RuleConstants::reference();
    assert_eq!(long_fac(&c.damping, 1), 1.0);
    assert_eq!(long_fac(&c.damping, 7), 1.0);
    assert!(close(long_fac(&c.damping, 8), 1.0 - 0.111 * 2f64.ln()));
    assert!(close(long_fac(&c.damping, 100), 0.495_694_279_168_029_55));
    assert_eq!(long_fac(&c.damping, 10_000), 0.0);
}

#[test]
fn damping_offset_follows_free_days() {
    let mut c = RuleConstants::reference();
    c.damping.free_days = 9;
    assert_eq!(long_fac(&c.damping, 9), 1.0);
    assert!(close(long_fac(&c.damping, 10), 1.0 - 0.111 * 2f64.ln()));
    assert!(close(long_fac(&c.damping, 12), 1.0 - 0.111 * 4f64.ln()));

    c.damping.free_days = 1;
    assert!(close(long_fac(&c.damping, 2), 1.0 - 0.111 * 2f64.ln()));
}

#[test]
fn short_hop_delta_depends_on_days() {
    let m = RuleConstants::reference().mileage;
    assert_eq!(mile_delta(&m, 1, 100.0), 0.0);
    assert_eq!(mile_delta(&m, 2, 50.0), -150.0);
    assert_eq!(mile_delta(&m, 3, 0.0), -150.0);
    assert_eq!(mile_delta(&m, 4, 99.0), -100.0);
    assert_eq!(mile_delta(&m, 6, 100.0), -100.0);
    assert_eq!(mile_delta(&m, 7, 10.0), -50.0);
    assert_eq!(mile_delta(&m, 30, 10.0), -50.0);
}

#[test]
fn mileage_bands_are_non_monotonic() {
    let m = RuleConstants::reference().mileage;
    assert_eq!(mile_delta(&m, 1, 100.5), -25.0);
    assert_eq!(mile_delta(&m, 1, 300.0), -25.0);
    assert_eq!(mile_delta(&m, 3, 301.0), 21.0);
    assert_eq!(mile_delta(&m, 3, 600.0), 21.0);
    assert_eq!(mile_delta(&m, 9, 1_000.0), 254.0);
    assert_eq!(mile_delta(&m, 9, 1_000.1), 314.0);
}

#[test]
fn receipt_curve_regimes() {
    let r = RuleConstants::reference().receipts;
    // days <= 2: 0.60 then 0.15 past 1000/day
    assert!(close(rec_comp(&r, 2, 49.49), 29.694));
    assert!(close(rec_comp(&r, 1, 1_500.0), 600.0 + 75.0));
    // days 3-6: 0.45 then 0.15
    assert!(close(rec_comp(&r, 3, 5_000.0), 1_650.0));
    assert!(close(rec_comp(&r, 6, 300.0), 135.0));
    // days >= 7: base + spill - penalty
    assert!(close(rec_comp(&r, 8, 1_200.0), 540.0));
    assert!(close(rec_comp(&r, 14, 2_275.0), 971.25));
}

#[test]
fn long_receipt_curve_has_no_floor() {
    let r = RuleConstants::reference().receipts;
    // knee 1050: 472.5 base + 157.5 spill - 0.39 * 2900 penalty
    assert!(close(rec_comp(&r, 7, 5_000.0), -501.0));
    assert!(close(rec_comp(&r, 10, 5_000.0), 0.0));
}

#[test]
fn efficiency_is_floored_only_for_short_trips() {
    let e = RuleConstants::reference().efficiency;
    assert!(close(eff_bonus(&e, 5, 1_000.0), 80.0));
    assert!(close(eff_bonus(&e, 5, 0.0), 32.662_721_893_491_124));
    assert_eq!(eff_bonus(&e, 3, 3_000.0), 0.0);
    assert_eq!(eff_bonus(&e, 1, 600.0), 0.0);
    assert!(close(eff_bonus(&e, 12, 6_000.0), -26.508_875_739_644_946));
}

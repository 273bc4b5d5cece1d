use pretty_assertions::assert_eq;
use refi_core::refinance::{analyze_refinance, find_break_even, BreakEven, RefinanceSettings};
use refi_core::time_value::round_cents;
use refi_core::RefiError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SETTINGS_YAML: &str = include_str!("fixtures/setting.yaml");

fn fixture() -> RefinanceSettings {
    serde_yaml::from_str(SETTINGS_YAML).unwrap()
}

// ===========================================================================
// Settings
// ===========================================================================

#[test]
fn test_fixture_settings_load() {
    let s = fixture();
    assert_eq!(s.original.principal, dec!(250000));
    assert_eq!(s.original.escrow, dec!(410.25));
    assert_eq!(s.original.optional_payments.custom.len(), 3);
    assert_eq!(s.refinance.start_month, 36);
    assert_eq!(s.refinance.fee, dec!(4250));
    s.validate().unwrap();
}

// ===========================================================================
// Three-plan comparison
// ===========================================================================

#[test]
fn test_refinance_uses_original_balance_at_start() {
    let out = analyze_refinance(&fixture()).unwrap();
    let a = &out.result;
    assert_eq!(a.refinance.principal, a.original.schedule.rows[36].balance);
    assert_eq!(a.original.principal, dec!(250000));
    assert_eq!(a.modified_original.principal, dec!(250000));
}

#[test]
fn test_adjustment_flag_follows_payment_delta() {
    let out = analyze_refinance(&fixture()).unwrap();
    let a = &out.result;
    assert_eq!(
        a.payment_delta,
        a.refinance.fixed_payment - a.original.fixed_payment
    );
    assert_eq!(a.adjustment_applied, a.payment_delta > Decimal::ZERO);
    if !a.adjustment_applied {
        assert_eq!(a.modified_original.schedule, a.original.schedule);
    }
}

#[test]
fn test_summary_matches_plans() {
    let out = analyze_refinance(&fixture()).unwrap();
    let a = &out.result;
    let methods: Vec<&str> = a.summary.iter().map(|s| s.method.as_str()).collect();
    assert_eq!(methods, vec!["Original", "Refinance", "Modified Original"]);

    for (line, plan) in a
        .summary
        .iter()
        .zip([&a.original, &a.refinance, &a.modified_original])
    {
        assert_eq!(line.months, plan.schedule.months());
        assert_eq!(line.total_interest, plan.schedule.total_interest());
        assert_eq!(line.total_cost, plan.schedule.total_paid());
        assert_eq!(line.monthly_payment, plan.fixed_payment + plan.escrow);
    }
}

#[test]
fn test_net_saving_and_break_even() {
    let out = analyze_refinance(&fixture()).unwrap();
    let a = &out.result;

    let expected = round_cents(a.modified_original.total_interest - a.refinance.total_interest)
        - a.fee;
    assert_eq!(a.net_saving, expected);

    let recomputed = find_break_even(&a.refinance.schedule, &a.modified_original.schedule, a.fee);
    assert_eq!(a.break_even, recomputed);
}

#[test]
fn test_higher_refinance_payment_adjusts_original() {
    let mut s = fixture();
    // 10-year refinance forces a larger payment than the 30-year original
    s.refinance.term_months = 120;
    let out = analyze_refinance(&s).unwrap();
    let a = &out.result;

    assert!(a.adjustment_applied);
    let rows = &a.modified_original.schedule.rows;
    let original_extra = s.original.optional_payments.plan(360).unwrap();
    assert_eq!(rows[35].extra_principal, original_extra.for_month(36));
    assert_eq!(
        rows[36].extra_principal,
        original_extra.for_month(37) + a.payment_delta
    );
    assert!(a.modified_original.months < a.original.months);
}

#[test]
fn test_envelope_echoes_settings() {
    let out = analyze_refinance(&fixture()).unwrap();
    assert_eq!(out.assumptions["refinance"]["start_month"], 36);
    assert!(out.methodology.contains("Refinance"));
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert_eq!(out.metadata.rounding, "cents_half_even");
}

#[test]
fn test_break_even_serialized_flat() {
    let out = analyze_refinance(&fixture()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    let be = &json["result"]["break_even"];
    assert_eq!(be["reached"].as_bool().unwrap(), out.result.break_even.is_reached());
    assert_eq!(
        be["sentinel"].as_u64().unwrap(),
        u64::from(out.result.break_even.sentinel())
    );
    if let BreakEven::Month(m) = out.result.break_even {
        assert_eq!(be["month"].as_u64().unwrap(), u64::from(m));
    }
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_zero_principal_rejected_before_generation() {
    let mut s = fixture();
    s.original.principal = Decimal::ZERO;
    let err = analyze_refinance(&s).unwrap_err();
    assert!(matches!(err, RefiError::InvalidInput { ref field, .. } if field == "original.principal"));
}

#[test]
fn test_negative_refinance_rate_rejected() {
    let mut s = fixture();
    s.refinance.annual_rate = dec!(-0.1);
    assert!(matches!(
        analyze_refinance(&s),
        Err(RefiError::InvalidInput { .. })
    ));
}

#[test]
fn test_zero_rate_refinance_supported() {
    let mut s = fixture();
    s.refinance.annual_rate = Decimal::ZERO;
    let out = analyze_refinance(&s).unwrap();
    let a = &out.result;
    assert_eq!(a.refinance.total_interest, Decimal::ZERO);
    assert_eq!(a.refinance.schedule.final_balance(), Decimal::ZERO);

    let residual_noted = out
        .warnings
        .iter()
        .any(|w| w.starts_with("Refinance plan final payment adjusted"));
    assert_eq!(residual_noted, !a.refinance.schedule.final_adjustment.is_zero());
}

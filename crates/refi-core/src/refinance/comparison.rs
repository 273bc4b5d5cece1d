//! Original-versus-refinance comparison.
//!
//! Builds three schedules: the original loan, the refinance of the
//! original's balance at the configured start row, and a "modified original"
//! that pays the refinance's higher monthly payment as extra principal so
//! the two plans cost the same each month. Interest totals of the modified
//! and refinance plans then give the net saving and break-even month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::extra_payments::ExtraPaymentSchedule;
use crate::amortization::schedule::{generate_schedule, LoanTerms, Schedule};
use crate::error::RefiError;
use crate::refinance::break_even::{find_break_even, BreakEven};
use crate::refinance::settings::RefinanceSettings;
use crate::time_value::round_cents;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RefiResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One fully computed loan plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    pub label: String,
    pub principal: Money,
    pub escrow: Money,
    pub annual_rate: Percent,
    pub term_months: u32,
    /// Principal and interest payment.
    pub fixed_payment: Money,
    /// Minimum due each month: fixed payment plus escrow.
    pub monthly_due: Money,
    pub months: u32,
    pub paid_off_early: bool,
    pub total_interest: Money,
    /// Every payment made, escrow included.
    pub total_paid: Money,
    pub schedule: Schedule,
}

/// One line of the side-by-side summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub method: String,
    pub months: u32,
    pub interest_rate: Percent,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
}

impl From<&PlanResult> for PlanSummary {
    fn from(plan: &PlanResult) -> Self {
        PlanSummary {
            method: plan.label.clone(),
            months: plan.months,
            interest_rate: plan.annual_rate,
            monthly_payment: plan.monthly_due,
            total_interest: plan.total_interest,
            total_cost: plan.total_paid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceAnalysis {
    pub original: PlanResult,
    pub refinance: PlanResult,
    pub modified_original: PlanResult,
    /// Refinance fixed payment minus original fixed payment.
    pub payment_delta: Money,
    /// Whether the delta was added to the original as extra principal.
    pub adjustment_applied: bool,
    /// Zero-based month from which the adjustment applies.
    pub adjustment_start: u32,
    pub summary: Vec<PlanSummary>,
    pub fee: Money,
    /// Modified-original interest minus refinance interest, less the fee.
    pub net_saving: Money,
    pub break_even: BreakEven,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the three-plan refinance comparison.
pub fn analyze_refinance(
    settings: &RefinanceSettings,
) -> RefiResult<ComputationOutput<RefinanceAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    settings.validate()?;

    let orig = &settings.original;
    let refi = &settings.refinance;

    // Original plan
    let original_terms = LoanTerms {
        principal: orig.principal,
        term_months: orig.term_months,
        annual_rate: orig.annual_rate,
        escrow: orig.escrow,
    };
    let original_payment = original_terms.monthly_payment()?;
    let original_extra = orig.optional_payments.plan(orig.term_months)?;
    let original = build_plan_result("Original", &original_terms, original_payment, &original_extra)?;

    // Refinance plan, principal taken from the original's balance column
    let start_offset = refi.start_month as usize;
    let refinance_principal = original.schedule.balance_at(start_offset).ok_or_else(|| {
        RefiError::invalid(
            "refinance.start_month",
            format!(
                "Original loan is paid off after {} months, before start row {}",
                original.months, refi.start_month
            ),
        )
    })?;
    if refinance_principal <= Decimal::ZERO {
        return Err(RefiError::invalid(
            "refinance.start_month",
            format!(
                "Original loan has no balance left at start row {}",
                refi.start_month
            ),
        ));
    }

    let refinance_terms = LoanTerms {
        principal: refinance_principal,
        term_months: refi.term_months,
        annual_rate: refi.annual_rate,
        escrow: refi.escrow,
    };
    let refinance_payment = refinance_terms.monthly_payment()?;
    let refinance_extra = refi.optional_payments.plan(refi.term_months)?;
    let refinance = build_plan_result(
        "Refinance",
        &refinance_terms,
        refinance_payment,
        &refinance_extra,
    )?;

    // Apples-to-apples: the original pays the refinance's higher payment too
    let payment_delta = refinance_payment - original_payment;
    let adjustment_applied = payment_delta > Decimal::ZERO;
    let modified_original = if adjustment_applied {
        let adjusted_extra = original_extra.with_delta_from(start_offset, payment_delta)?;
        tracing::info!(
            payment_delta = %payment_delta,
            start_month = refi.start_month,
            "adding refinance payment delta to original plan as extra principal"
        );
        build_plan_result(
            "Modified Original",
            &original_terms,
            original_payment,
            &adjusted_extra,
        )?
    } else {
        warnings.push(format!(
            "Refinance payment {} does not exceed original payment {}; modified plan equals original",
            refinance_payment, original_payment
        ));
        PlanResult {
            label: "Modified Original".into(),
            ..original.clone()
        }
    };

    let net_saving =
        round_cents(modified_original.total_interest - refinance.total_interest) - refi.fee;
    let break_even = find_break_even(&refinance.schedule, &modified_original.schedule, refi.fee);

    tracing::info!(
        net_saving = %net_saving,
        break_even = break_even.sentinel(),
        reached = break_even.is_reached(),
        "refinance comparison complete"
    );

    for plan in [&original, &refinance, &modified_original] {
        if plan.paid_off_early {
            warnings.push(format!(
                "{} plan paid off in month {} of {}",
                plan.label, plan.months, plan.term_months
            ));
        }
        if !plan.schedule.final_adjustment.is_zero() {
            warnings.push(format!(
                "{} plan final payment adjusted by {} to clear rounding residual",
                plan.label, plan.schedule.final_adjustment
            ));
        }
    }
    if !break_even.is_reached() {
        warnings.push(format!(
            "Refinancing fee is not recovered within the {}-month comparison horizon",
            break_even.sentinel()
        ));
    }
    if net_saving <= Decimal::ZERO {
        warnings.push(format!("Refinancing loses {} overall", -net_saving));
    }

    let summary = vec![
        PlanSummary::from(&original),
        PlanSummary::from(&refinance),
        PlanSummary::from(&modified_original),
    ];

    let analysis = RefinanceAnalysis {
        original,
        refinance,
        modified_original,
        payment_delta,
        adjustment_applied,
        adjustment_start: refi.start_month,
        summary,
        fee: refi.fee,
        net_saving,
        break_even,
    };

    with_metadata(
        "Refinance comparison with apples-to-apples payment adjustment",
        settings,
        warnings,
        start,
        analysis,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_plan_result(
    label: &str,
    terms: &LoanTerms,
    fixed_payment: Money,
    extra: &ExtraPaymentSchedule,
) -> RefiResult<PlanResult> {
    let schedule = generate_schedule(terms, fixed_payment, extra)?;
    if schedule.is_empty() {
        return Err(RefiError::InsufficientData(format!(
            "{label} plan produced no schedule rows"
        )));
    }

    tracing::info!(
        plan = label,
        principal = %terms.principal,
        fixed_payment = %fixed_payment,
        months = schedule.months(),
        "plan computed"
    );

    Ok(PlanResult {
        label: label.to_string(),
        principal: terms.principal,
        escrow: terms.escrow,
        annual_rate: terms.annual_rate,
        term_months: terms.term_months,
        fixed_payment,
        monthly_due: fixed_payment + terms.escrow,
        months: schedule.months(),
        paid_off_early: schedule.paid_off_early,
        total_interest: schedule.total_interest(),
        total_paid: schedule.total_paid(),
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::extra_payments::OptionalPayments;
    use crate::refinance::settings::{OriginalPlanSettings, RefinancePlanSettings};
    use rust_decimal_macros::dec;

    fn settings(refi_rate: Percent, refi_term: u32, fee: Money) -> RefinanceSettings {
        RefinanceSettings {
            original: OriginalPlanSettings {
                principal: dec!(200000),
                escrow: dec!(300),
                annual_rate: dec!(6),
                term_months: 360,
                optional_payments: OptionalPayments::none(),
            },
            refinance: RefinancePlanSettings {
                escrow: dec!(300),
                annual_rate: refi_rate,
                term_months: refi_term,
                start_month: 24,
                fee,
                optional_payments: OptionalPayments::none(),
            },
        }
    }

    #[test]
    fn test_refinance_principal_is_original_balance_at_start_row() {
        let out = analyze_refinance(&settings(dec!(3.5), 180, dec!(3000))).unwrap();
        let a = &out.result;
        assert_eq!(
            a.refinance.principal,
            a.original.schedule.rows[24].balance
        );
        assert_eq!(a.refinance.schedule.rows[0].month, 1);
    }

    #[test]
    fn test_shorter_refinance_triggers_adjustment() {
        // 15-year refinance has a higher payment than the 30-year original
        let out = analyze_refinance(&settings(dec!(3.5), 180, dec!(3000))).unwrap();
        let a = &out.result;
        assert!(a.adjustment_applied);
        assert_eq!(
            a.payment_delta,
            a.refinance.fixed_payment - a.original.fixed_payment
        );

        let modified = &a.modified_original.schedule;
        // No extra before the start row, the delta from it onward
        assert!(modified.rows[..24].iter().all(|r| r.extra_principal.is_zero()));
        assert_eq!(modified.rows[24].extra_principal, a.payment_delta);
        assert!(a.modified_original.paid_off_early);
        assert_eq!(a.modified_original.fixed_payment, a.original.fixed_payment);
        assert!(a.modified_original.total_interest < a.original.total_interest);
    }

    #[test]
    fn test_lower_payment_refinance_reuses_original() {
        let out = analyze_refinance(&settings(dec!(5.5), 360, dec!(3000))).unwrap();
        let a = &out.result;
        assert!(!a.adjustment_applied);
        assert!(a.payment_delta <= Decimal::ZERO);
        assert_eq!(a.modified_original.label, "Modified Original");
        assert_eq!(a.modified_original.schedule, a.original.schedule);
        assert!(out.warnings.iter().any(|w| w.contains("does not exceed")));
    }

    #[test]
    fn test_net_saving_formula() {
        let out = analyze_refinance(&settings(dec!(3.5), 180, dec!(3000))).unwrap();
        let a = &out.result;
        let expected = round_cents(a.modified_original.total_interest - a.refinance.total_interest)
            - dec!(3000);
        assert_eq!(a.net_saving, expected);
        assert_eq!(a.summary.len(), 3);
        assert_eq!(a.summary[1].method, "Refinance");
        assert_eq!(a.summary[1].monthly_payment, a.refinance.fixed_payment + dec!(300));
    }

    #[test]
    fn test_break_even_consistent_with_schedules() {
        let out = analyze_refinance(&settings(dec!(3.5), 180, dec!(3000))).unwrap();
        let a = &out.result;
        if let BreakEven::Month(m) = a.break_even {
            let idx = (m - 1) as usize;
            let saving = a.modified_original.schedule.rows[idx].total_interest
                - a.refinance.schedule.rows[idx].total_interest;
            assert!(saving > a.fee);
            if idx > 0 {
                let prior = a.modified_original.schedule.rows[idx - 1].total_interest
                    - a.refinance.schedule.rows[idx - 1].total_interest;
                assert!(prior <= a.fee);
            }
        } else {
            panic!("expected break-even with a 2.5 point rate cut");
        }
    }

    #[test]
    fn test_huge_fee_never_breaks_even() {
        let out = analyze_refinance(&settings(dec!(3.5), 180, dec!(10_000_000))).unwrap();
        let a = &out.result;
        assert_eq!(
            a.break_even,
            BreakEven::NotReached {
                horizon: a.refinance.months
            }
        );
        assert!(a.net_saving < Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("not recovered")));
        assert!(out.warnings.iter().any(|w| w.contains("loses")));
    }

    #[test]
    fn test_start_after_payoff_rejected() {
        let mut s = settings(dec!(3.5), 180, dec!(3000));
        s.original.optional_payments.custom.insert(1, dec!(500000));
        let err = analyze_refinance(&s).unwrap_err();
        assert!(
            matches!(err, RefiError::InvalidInput { ref field, .. } if field == "refinance.start_month")
        );
    }

    #[test]
    fn test_start_on_final_row_has_no_balance_to_refinance() {
        let mut s = settings(dec!(3.5), 180, dec!(3000));
        s.refinance.start_month = 359;
        let err = analyze_refinance(&s).unwrap_err();
        assert!(
            matches!(err, RefiError::InvalidInput { ref field, .. } if field == "refinance.start_month")
        );
    }

    #[test]
    fn test_rounding_residual_warned_per_plan() {
        // 10000 over 12 months at 0% pays 833.33 and leaves 0.04 for month 12
        let mut s = settings(Decimal::ZERO, 12, dec!(50));
        s.original.principal = dec!(10000);
        s.original.annual_rate = Decimal::ZERO;
        s.original.term_months = 12;
        s.refinance.start_month = 6;
        let out = analyze_refinance(&s).unwrap();
        let a = &out.result;

        assert_eq!(a.original.schedule.final_adjustment, dec!(0.04));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("Original plan final payment adjusted by 0.04")));
        for plan in [&a.original, &a.refinance, &a.modified_original] {
            let noted = out.warnings.iter().any(|w| {
                w.starts_with(&format!("{} plan final payment adjusted", plan.label))
            });
            assert_eq!(noted, !plan.schedule.final_adjustment.is_zero(), "{}", plan.label);
        }
    }

    #[test]
    fn test_refinance_term_above_cap_rejected() {
        let s = settings(dec!(3.5), 4_000_000_000, dec!(3000));
        let err = analyze_refinance(&s).unwrap_err();
        assert!(
            matches!(err, RefiError::InvalidInput { ref field, .. } if field == "refinance.term_months")
        );
    }
}

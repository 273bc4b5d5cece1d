pub mod extra_payments;
pub mod schedule;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RefiError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RefiResult;

use extra_payments::{ExtraPaymentSchedule, OptionalPayments};
use schedule::{generate_schedule, LoanTerms, Schedule};

/// Single-loan amortization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub term_months: u32,
    /// Annual interest rate in percent.
    pub annual_rate: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escrow: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_payments: Option<OptionalPayments>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub fixed_payment: Money,
    /// Fixed payment plus escrow.
    pub monthly_due: Money,
    pub months: u32,
    pub paid_off_early: bool,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_paid: Money,
    /// Interest avoided relative to the same loan without extra payments.
    pub interest_saved: Money,
    /// Months cut from the schedule by extra payments.
    pub months_saved: u32,
    pub schedule: Schedule,
}

/// Build the amortization schedule for a single loan, comparing it with the
/// same loan paid on schedule to report what the extra payments save.
pub fn build_amortization(
    input: &AmortizationInput,
) -> RefiResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = LoanTerms {
        principal: input.principal,
        term_months: input.term_months,
        annual_rate: input.annual_rate,
        escrow: input.escrow.unwrap_or(Decimal::ZERO),
    };
    terms.validate()?;

    let fixed_payment = terms.monthly_payment()?;
    let extra = match &input.optional_payments {
        Some(opt) => opt.plan(terms.term_months)?,
        None => ExtraPaymentSchedule::zeros(terms.term_months),
    };

    let schedule = generate_schedule(&terms, fixed_payment, &extra)?;
    let baseline = generate_schedule(
        &terms,
        fixed_payment,
        &ExtraPaymentSchedule::zeros(terms.term_months),
    )?;

    let last = schedule.last().cloned().ok_or_else(|| {
        RefiError::InsufficientData("Amortization produced no schedule rows".into())
    })?;

    if schedule.paid_off_early {
        warnings.push(format!(
            "Loan paid off in month {} of {}",
            last.month, terms.term_months
        ));
    }
    if !schedule.final_adjustment.is_zero() {
        warnings.push(format!(
            "Final payment adjusted by {} to clear rounding residual",
            schedule.final_adjustment
        ));
    }

    let output = AmortizationOutput {
        fixed_payment,
        monthly_due: fixed_payment + terms.escrow,
        months: schedule.months(),
        paid_off_early: schedule.paid_off_early,
        total_interest: last.total_interest,
        total_principal: last.total_principal,
        total_paid: last.total_paid,
        interest_saved: baseline.total_interest() - last.total_interest,
        months_saved: baseline.months().saturating_sub(schedule.months()),
        schedule,
    };

    with_metadata(
        "Fixed-payment amortization with extra principal",
        input,
        warnings,
        start,
        output,
    )
}

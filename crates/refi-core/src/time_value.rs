use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RefiError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::RefiResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT_SCALE: Decimal = dec!(100);

/// Longest accepted loan term: one hundred years of monthly payments.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Round a money amount to cents using round-half-to-even.
///
/// Every cent rounding in the crate goes through here so the fixed payment,
/// the monthly interest and the reported savings agree on a single rule.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Convert an annual percentage rate into the monthly periodic rate.
pub fn monthly_rate(annual_rate: Percent) -> Rate {
    annual_rate / MONTHS_PER_YEAR / PERCENT_SCALE
}

/// Check the loan preconditions shared by the payment formula and the
/// schedule generator.
pub fn validate_loan(principal: Money, term_months: u32, annual_rate: Percent) -> RefiResult<()> {
    if principal <= Decimal::ZERO {
        return Err(RefiError::invalid("principal", "Loan principal must be positive"));
    }
    if term_months == 0 {
        return Err(RefiError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(RefiError::invalid(
            "term_months",
            format!("Term cannot exceed {MAX_TERM_MONTHS} months"),
        ));
    }
    if annual_rate < Decimal::ZERO {
        return Err(RefiError::invalid(
            "annual_rate",
            "Interest rate cannot be negative",
        ));
    }
    Ok(())
}

/// Fixed monthly payment of a fully amortizing loan, rounded to cents.
///
/// `payment = P * r * (1 + 1 / ((1 + r)^n - 1))` with `r` the monthly rate.
/// A zero rate is the removable singularity of that formula and is priced
/// as straight-line repayment, `P / n`.
pub fn monthly_payment(principal: Money, term_months: u32, annual_rate: Percent) -> RefiResult<Money> {
    validate_loan(principal, term_months, annual_rate)?;

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return nonzero_payment(principal / Decimal::from(term_months), principal, term_months);
    }

    let interest_only = principal.checked_mul(r).ok_or_else(|| {
        RefiError::invalid(
            "annual_rate",
            "Monthly interest on the principal exceeds the decimal range",
        )
    })?;

    // Growth past Decimal::MAX means 1 / (growth - 1) vanishes at 28 digits.
    let growth = match (Decimal::ONE + r).checked_powu(u64::from(term_months)) {
        Some(g) => g,
        None => return nonzero_payment(interest_only, principal, term_months),
    };
    let annuity_denominator = growth - Decimal::ONE;
    if annuity_denominator.is_zero() {
        return Err(RefiError::DivisionByZero {
            context: "monthly payment annuity factor".into(),
        });
    }

    let payment = interest_only
        .checked_mul(Decimal::ONE + Decimal::ONE / annuity_denominator)
        .ok_or_else(|| {
            RefiError::invalid("annual_rate", "Monthly payment exceeds the decimal range")
        })?;
    nonzero_payment(payment, principal, term_months)
}

fn nonzero_payment(unrounded: Money, principal: Money, term_months: u32) -> RefiResult<Money> {
    let payment = round_cents(unrounded);
    if payment.is_zero() {
        return Err(RefiError::invalid(
            "principal",
            format!(
                "Principal {principal} is too small: the payment over {term_months} months rounds to zero cents"
            ),
        ));
    }
    Ok(payment)
}

// ---------------------------------------------------------------------------
// Payment summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal term in months.
    pub term_months: u32,
    /// Annual interest rate in percent (4.0 = 4%).
    pub annual_rate: Percent,
    /// Fixed monthly escrow add-on (taxes, insurance).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escrow: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// Principal and interest portion, rounded to cents.
    pub fixed_payment: Money,
    pub monthly_rate: Rate,
    pub escrow: Money,
    /// Minimum amount due each month: fixed payment plus escrow.
    pub monthly_due: Money,
    /// Fixed payment times the term, before any final-month true-up.
    pub nominal_total_paid: Money,
}

/// Compute the fixed payment and the minimum monthly amount due for a loan.
pub fn monthly_payment_summary(
    input: &PaymentInput,
) -> RefiResult<ComputationOutput<PaymentSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let escrow = input.escrow.unwrap_or(Decimal::ZERO);
    if escrow < Decimal::ZERO {
        return Err(RefiError::invalid("escrow", "Escrow cannot be negative"));
    }

    let fixed_payment = monthly_payment(input.principal, input.term_months, input.annual_rate)?;
    if input.annual_rate.is_zero() {
        warnings.push("Zero interest rate: payment is straight-line principal / term".into());
    }

    let too_large = || RefiError::invalid("escrow", "Monthly amount due exceeds the decimal range");
    let monthly_due = fixed_payment.checked_add(escrow).ok_or_else(too_large)?;
    let nominal_total_paid = monthly_due
        .checked_mul(Decimal::from(input.term_months))
        .ok_or_else(too_large)?;

    let summary = PaymentSummary {
        fixed_payment,
        monthly_rate: monthly_rate(input.annual_rate),
        escrow,
        monthly_due,
        nominal_total_paid,
    };

    with_metadata(
        "Fixed-payment annuity (monthly compounding)",
        input,
        warnings,
        start,
        summary,
    )
}

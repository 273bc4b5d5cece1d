//! Month-by-month amortization schedule with extra principal payments.
//!
//! Each month charges interest on the outstanding balance (rounded to cents),
//! applies the scheduled principal `fixed_payment - interest`, then the
//! requested extra principal. When a month's payment would overshoot the
//! balance it is clamped to the exact remainder and the schedule stops there.
//! Any residual left by cent rounding after the last nominal month is swept
//! into that month's scheduled principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::extra_payments::ExtraPaymentSchedule;
use crate::error::RefiError;
use crate::time_value::{monthly_payment, monthly_rate, round_cents, validate_loan};
use crate::types::{Money, Percent};
use crate::RefiResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal term in months.
    pub term_months: u32,
    /// Annual interest rate in percent.
    pub annual_rate: Percent,
    /// Fixed monthly add-on that does not touch principal or interest.
    pub escrow: Money,
}

impl LoanTerms {
    pub fn validate(&self) -> RefiResult<()> {
        validate_loan(self.principal, self.term_months, self.annual_rate)?;
        if self.escrow < Decimal::ZERO {
            return Err(RefiError::invalid("escrow", "Escrow cannot be negative"));
        }
        Ok(())
    }

    /// Fixed principal-and-interest payment for these terms.
    ///
    /// Fails when cent rounding leaves a payment that no longer exceeds the
    /// first month's interest, since such a loan never amortizes.
    pub fn monthly_payment(&self) -> RefiResult<Money> {
        let payment = monthly_payment(self.principal, self.term_months, self.annual_rate)?;
        let first_interest = first_month_interest(self.principal, monthly_rate(self.annual_rate))?;
        if payment <= first_interest {
            return Err(RefiError::invalid(
                "term_months",
                format!(
                    "Rounded payment {} does not exceed the first month's interest {}; \
                     the loan cannot amortize over {} months",
                    payment, first_interest, self.term_months
                ),
            ));
        }
        Ok(payment)
    }
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// One-based month index.
    pub month: u32,
    /// Interest charged this month.
    pub interest: Money,
    /// Cumulative interest through this month.
    pub total_interest: Money,
    /// Scheduled principal this month.
    pub principal: Money,
    /// Extra principal actually applied this month, after overpayment clamping.
    pub extra_principal: Money,
    /// Cumulative principal (scheduled plus extra) through this month.
    pub total_principal: Money,
    /// Amount due this month: interest, principal, extra and escrow.
    pub payment: Money,
    /// Cumulative amount paid through this month.
    pub total_paid: Money,
    /// Balance remaining after this month's payment.
    pub balance: Money,
}

/// A generated schedule, shorter than the nominal term when paid off early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
    /// True when the loan cleared before its nominal term.
    pub paid_off_early: bool,
    /// Rounding residual folded into the last nominal month's principal.
    pub final_adjustment: Money,
}

impl Schedule {
    pub fn from_rows(rows: Vec<ScheduleRow>, term_months: u32) -> Self {
        let paid_off_early = rows.len() < term_months as usize;
        Self {
            rows,
            paid_off_early,
            final_adjustment: Decimal::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn months(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn last(&self) -> Option<&ScheduleRow> {
        self.rows.last()
    }

    pub fn total_interest(&self) -> Money {
        self.last().map_or(Decimal::ZERO, |r| r.total_interest)
    }

    pub fn total_principal(&self) -> Money {
        self.last().map_or(Decimal::ZERO, |r| r.total_principal)
    }

    pub fn total_paid(&self) -> Money {
        self.last().map_or(Decimal::ZERO, |r| r.total_paid)
    }

    pub fn final_balance(&self) -> Money {
        self.last().map_or(Decimal::ZERO, |r| r.balance)
    }

    /// Balance column at a zero-based row offset.
    pub fn balance_at(&self, offset: usize) -> Option<Money> {
        self.rows.get(offset).map(|r| r.balance)
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Generate the amortization schedule for `terms` paying `fixed_payment`
/// (principal and interest) plus `extra` principal each month.
pub fn generate_schedule(
    terms: &LoanTerms,
    fixed_payment: Money,
    extra: &ExtraPaymentSchedule,
) -> RefiResult<Schedule> {
    terms.validate()?;

    let term = terms.term_months;
    if extra.len() < term as usize {
        return Err(RefiError::invalid(
            "extra_payments",
            format!(
                "Expected an entry for each of {} months, got {}",
                term,
                extra.len()
            ),
        ));
    }

    let r = monthly_rate(terms.annual_rate);
    if fixed_payment <= first_month_interest(terms.principal, r)? {
        return Err(RefiError::invalid(
            "fixed_payment",
            "Fixed payment must exceed the first month's interest",
        ));
    }

    let mut rows = Vec::with_capacity(term as usize);
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut final_adjustment = Decimal::ZERO;

    for month in 1..=term {
        let balance = terms.principal - total_principal;
        let interest = round_cents(balance * r);
        let mut principal = fixed_payment - interest;
        let mut extra_principal = extra.for_month(month);

        let terminal = if principal > balance {
            principal = balance;
            extra_principal = Decimal::ZERO;
            true
        } else if extra_principal > balance - principal {
            extra_principal = balance - principal;
            true
        } else if month == term {
            // Last nominal month clears whatever cent rounding left behind.
            final_adjustment = balance - principal - extra_principal;
            principal += final_adjustment;
            true
        } else {
            false
        };

        total_interest = running_total(total_interest, interest, "annual_rate")?;
        total_principal += principal + extra_principal;
        let payment = running_total(interest + principal + extra_principal, terms.escrow, "escrow")?;
        total_paid = running_total(total_paid, payment, "escrow")?;

        rows.push(ScheduleRow {
            month,
            interest,
            total_interest,
            principal,
            extra_principal,
            total_principal,
            payment,
            total_paid,
            balance: terms.principal - total_principal,
        });

        if terminal {
            break;
        }
    }

    let schedule = Schedule {
        paid_off_early: rows.len() < term as usize,
        rows,
        final_adjustment,
    };

    tracing::debug!(
        principal = %terms.principal,
        term_months = term,
        months = schedule.months(),
        paid_off_early = schedule.paid_off_early,
        total_interest = %schedule.total_interest(),
        final_adjustment = %schedule.final_adjustment,
        "generated amortization schedule"
    );

    Ok(schedule)
}

fn first_month_interest(principal: Money, r: Decimal) -> RefiResult<Money> {
    principal.checked_mul(r).map(round_cents).ok_or_else(|| {
        RefiError::invalid(
            "annual_rate",
            "Monthly interest on the principal exceeds the decimal range",
        )
    })
}

fn running_total(total: Money, amount: Money, field: &str) -> RefiResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| RefiError::invalid(field, "Schedule totals exceed the decimal range"))
}

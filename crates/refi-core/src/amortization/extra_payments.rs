//! Per-month extra principal payments.
//!
//! A plan is a recurring amount applied to every month of the term plus
//! sparse one-time amounts keyed by one-based month. One-time amounts add
//! to the recurring amount rather than replace it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RefiError;
use crate::time_value::MAX_TERM_MONTHS;
use crate::types::Money;
use crate::RefiResult;

/// Optional payment settings as they appear in loan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionalPayments {
    /// Amount paid toward principal every month.
    #[serde(alias = "Recurrent")]
    pub recurring: Money,
    /// One-time amounts keyed by one-based month index.
    #[serde(alias = "Custom")]
    pub custom: BTreeMap<u32, Money>,
}

impl OptionalPayments {
    pub fn none() -> Self {
        Self {
            recurring: Decimal::ZERO,
            custom: BTreeMap::new(),
        }
    }

    /// Expand into one entry per month of `term_months`.
    pub fn plan(&self, term_months: u32) -> RefiResult<ExtraPaymentSchedule> {
        build_plan(term_months, self.recurring, &self.custom)
    }
}

/// Extra principal to pay in each month, index 0 holding month 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraPaymentSchedule(Vec<Money>);

impl ExtraPaymentSchedule {
    /// A schedule of `term_months` zero entries.
    pub fn zeros(term_months: u32) -> Self {
        Self(vec![Decimal::ZERO; term_months as usize])
    }

    pub fn from_amounts(amounts: Vec<Money>) -> RefiResult<Self> {
        if let Some(pos) = amounts.iter().position(|a| *a < Decimal::ZERO) {
            return Err(RefiError::invalid(
                format!("extra_payments[{}]", pos + 1),
                "Extra payments cannot be negative",
            ));
        }
        Ok(Self(amounts))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn amounts(&self) -> &[Money] {
        &self.0
    }

    /// Extra payment for a one-based month; zero outside the plan.
    pub fn for_month(&self, month: u32) -> Money {
        month
            .checked_sub(1)
            .and_then(|idx| self.0.get(idx as usize))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Money {
        self.0.iter().copied().sum()
    }

    /// Add `delta` to every entry from zero-based `start_offset` onward,
    /// leaving earlier months untouched.
    pub fn with_delta_from(&self, start_offset: usize, delta: Money) -> RefiResult<Self> {
        let amounts = self
            .0
            .iter()
            .enumerate()
            .map(|(idx, amount)| {
                if idx >= start_offset {
                    checked_sum(*amount, delta, idx as u32 + 1)
                } else {
                    Ok(*amount)
                }
            })
            .collect::<RefiResult<Vec<Money>>>()?;
        Self::from_amounts(amounts)
    }
}

/// Build the per-month extra payment list for a term.
///
/// Every month starts at `recurring`; each override whose month falls in
/// `1..=term_months` is added on top. Overrides outside the term are ignored.
pub fn build_plan(
    term_months: u32,
    recurring: Money,
    overrides: &BTreeMap<u32, Money>,
) -> RefiResult<ExtraPaymentSchedule> {
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
    if recurring < Decimal::ZERO {
        return Err(RefiError::invalid(
            "recurring",
            "Recurring extra payment cannot be negative",
        ));
    }

    let mut amounts = vec![recurring; term_months as usize];
    for (&month, &amount) in overrides {
        if amount < Decimal::ZERO {
            return Err(RefiError::invalid(
                format!("custom[{month}]"),
                "One-time extra payment cannot be negative",
            ));
        }
        if (1..=term_months).contains(&month) {
            let slot = &mut amounts[(month - 1) as usize];
            *slot = checked_sum(*slot, amount, month)?;
        }
    }

    Ok(ExtraPaymentSchedule(amounts))
}

fn checked_sum(amount: Money, addition: Money, month: u32) -> RefiResult<Money> {
    amount.checked_add(addition).ok_or_else(|| {
        RefiError::invalid(
            format!("extra_payments[{month}]"),
            "Extra payment exceeds the decimal range",
        )
    })
}

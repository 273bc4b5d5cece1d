use serde::{Deserialize, Serialize};

use crate::amortization::schedule::Schedule;
use crate::types::Money;

/// Month in which cumulative interest savings first exceed the refinancing fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BreakEvenReport", into = "BreakEvenReport")]
pub enum BreakEven {
    /// One-based month of the first strict crossing.
    Month(u32),
    /// No crossing within the overlap; `horizon` is the reference schedule length.
    NotReached { horizon: u32 },
}

impl BreakEven {
    pub fn month(&self) -> Option<u32> {
        match self {
            BreakEven::Month(m) => Some(*m),
            BreakEven::NotReached { .. } => None,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, BreakEven::Month(_))
    }

    /// Integer form: the break-even month, or the reference horizon when the
    /// fee is never recovered.
    pub fn sentinel(&self) -> u32 {
        match self {
            BreakEven::Month(m) => *m,
            BreakEven::NotReached { horizon } => *horizon,
        }
    }
}

/// Flat serialized form of [`BreakEven`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenReport {
    pub month: Option<u32>,
    pub reached: bool,
    pub sentinel: u32,
}

impl From<BreakEven> for BreakEvenReport {
    fn from(b: BreakEven) -> Self {
        BreakEvenReport {
            month: b.month(),
            reached: b.is_reached(),
            sentinel: b.sentinel(),
        }
    }
}

impl From<BreakEvenReport> for BreakEven {
    fn from(r: BreakEvenReport) -> Self {
        match r.month {
            Some(m) => BreakEven::Month(m),
            None => BreakEven::NotReached {
                horizon: r.sentinel,
            },
        }
    }
}

/// Find the first month where `comparison` has accrued more than `fee` in
/// extra cumulative interest over `reference`.
///
/// Months are compared position by position over the shorter of the two
/// schedules. A saving exactly equal to the fee does not break even.
pub fn find_break_even(reference: &Schedule, comparison: &Schedule, fee: Money) -> BreakEven {
    for (idx, (r, c)) in reference.rows.iter().zip(comparison.rows.iter()).enumerate() {
        let interest_saving = c.total_interest - r.total_interest;
        if interest_saving > fee {
            return BreakEven::Month(idx as u32 + 1);
        }
    }
    BreakEven::NotReached {
        horizon: reference.months(),
    }
}

//! Amortization schedules and refinance analysis for fixed-rate installment loans.
//!
//! All arithmetic is carried out in `rust_decimal::Decimal`; money is rounded
//! to cents with round-half-to-even wherever the loan math rounds.

pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "refinance")]
pub mod refinance;

pub use error::RefiError;
pub use types::*;

/// Standard result type for all refi-core operations
pub type RefiResult<T> = Result<T, RefiError>;

//! Numeric aliases and the result envelope shared by every entry point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::RefiResult;

/// Dollar amounts. Schedule figures are rounded to cents as they are produced.
pub type Money = Decimal;

/// Periodic rates as fractions (0.004 = 0.4% per month).
pub type Rate = Decimal;

/// Annual interest rates as quoted on a loan, in percent (4.25 = 4.25%).
pub type Percent = Decimal;

/// Envelope returned by `monthly_payment_summary`, `build_amortization` and
/// `analyze_refinance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T> {
    pub result: T,
    pub methodology: String,
    /// The input the result was computed from, echoed back verbatim.
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
    pub rounding: String,
    pub computation_time_us: u64,
}

impl ComputationMetadata {
    fn since(started: Instant) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
            rounding: "cents_half_even".to_string(),
            computation_time_us: started.elapsed().as_micros() as u64,
        }
    }
}

/// Wrap `result` in the envelope, timing it from `started`.
pub fn with_metadata<T>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    started: Instant,
    result: T,
) -> RefiResult<ComputationOutput<T>> {
    Ok(ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions)?,
        warnings,
        metadata: ComputationMetadata::since(started),
    })
}

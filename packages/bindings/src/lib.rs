use napi::Result as NapiResult;
use napi_derive::napi;

use refi_core::amortization::{self, AmortizationInput};
use refi_core::refinance::{self, RefinanceSettings};
use refi_core::time_value::{self, PaymentInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = time_value::monthly_payment_summary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_amortization(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn refinance_analysis(input_json: String) -> NapiResult<String> {
    let settings: RefinanceSettings = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = refinance::analyze_refinance(&settings).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

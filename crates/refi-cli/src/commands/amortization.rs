use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use refi_core::amortization::extra_payments::OptionalPayments;
use refi_core::amortization::{self, AmortizationInput};
use refi_core::time_value::{self, PaymentInput};

use crate::input;

/// Arguments for the fixed monthly payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Annual interest rate in percent (e.g. 4.25)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Monthly escrow added to the payment
    #[arg(long)]
    pub escrow: Option<Decimal>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a single-loan amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Annual interest rate in percent (e.g. 4.25)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Monthly escrow added to the payment
    #[arg(long)]
    pub escrow: Option<Decimal>,

    /// Extra principal paid every month
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Path to JSON/YAML input file, including one-time extra payments
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            escrow: args.escrow,
        }
    };

    let result = time_value::monthly_payment_summary(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            escrow: args.escrow,
            optional_payments: args.extra.map(|recurring| OptionalPayments {
                recurring,
                ..OptionalPayments::none()
            }),
        }
    };

    let result = amortization::build_amortization(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

//! Human-readable refinance report, written as a timestamped text file.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};

use refi_core::amortization::schedule::Schedule;
use refi_core::refinance::{BreakEven, PlanResult, RefinanceAnalysis};

const SCHEDULE_HEADERS: [&str; 9] = [
    "Month",
    "Interest",
    "Total Interest",
    "Principal",
    "Optional Pay",
    "Total Principal",
    "Payment",
    "Total Payment",
    "Balance",
];

const SUMMARY_HEADERS: [&str; 6] = [
    "Method",
    "Months",
    "Interest Rate",
    "Monthly Payment",
    "Total Interest",
    "Total of All Costs",
];

/// Render the report and write it to `dir/result_<dd_mm_YYYY_HHMMSS>.txt`,
/// creating the directory if needed.
pub fn write_report(
    dir: &Path,
    analysis: &RefinanceAnalysis,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;

    let now = Local::now();
    let path = dir.join(format!("result_{}.txt", now.format("%d_%m_%Y_%H%M%S")));
    fs::write(&path, render_report(analysis, now))
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    Ok(path)
}

pub fn render_report(analysis: &RefinanceAnalysis, run_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Loan refinance report");
    let _ = writeln!(
        out,
        "This calculation was run on {}",
        run_at.format("%d/%m/%Y %H:%M:%S")
    );

    write_plan(&mut out, "Calculation for original loan", &analysis.original);
    write_plan(&mut out, "Calculation for refinancing", &analysis.refinance);

    if analysis.adjustment_applied {
        write_banner(
            &mut out,
            "Adjusting the original plan with extra principal paid for refinancing",
        );
        let _ = writeln!(
            out,
            "In the refinance plan, an extra amount of ${} is paid monthly. For an \
             apples-to-apples comparison, this extra amount is added as an optional \
             payment to the original plan from month {} onwards.",
            analysis.payment_delta.round_dp(2),
            analysis.adjustment_start
        );
        write_plan(&mut out, "Modified original plan", &analysis.modified_original);
    }

    write_banner(&mut out, "Summary");
    let mut builder = Builder::default();
    builder.push_record(SUMMARY_HEADERS);
    for line in &analysis.summary {
        builder.push_record([
            line.method.clone(),
            line.months.to_string(),
            line.interest_rate.to_string(),
            line.monthly_payment.to_string(),
            line.total_interest.to_string(),
            line.total_cost.to_string(),
        ]);
    }
    let _ = writeln!(out, "{}", builder.build().with(Style::markdown()));
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", saving_line(analysis.net_saving));
    let _ = writeln!(out, "{}", break_even_line(&analysis.break_even));
    out
}

fn write_banner(out: &mut String, title: &str) {
    let rule = "-".repeat(title.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);
}

fn write_plan(out: &mut String, title: &str, plan: &PlanResult) {
    write_banner(out, title);
    let _ = writeln!(out, "Loan amount: {}", plan.principal);
    let _ = writeln!(out, "Escrow: {}", plan.escrow);
    let _ = writeln!(out, "Interest rate: {}", plan.annual_rate);
    let _ = writeln!(out, "Duration in months: {}", plan.term_months);
    let _ = writeln!(out, "Minimum monthly payment: {}", plan.monthly_due);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", schedule_table(&plan.schedule));
}

fn schedule_table(schedule: &Schedule) -> String {
    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_HEADERS);
    for row in &schedule.rows {
        builder.push_record([
            row.month.to_string(),
            row.interest.to_string(),
            row.total_interest.to_string(),
            row.principal.to_string(),
            row.extra_principal.to_string(),
            row.total_principal.to_string(),
            row.payment.to_string(),
            row.total_paid.to_string(),
            row.balance.to_string(),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}

fn saving_line(net_saving: Decimal) -> String {
    if net_saving > Decimal::ZERO {
        format!("Your saving by refinancing is: {}", net_saving)
    } else {
        format!("You lose this much by refinancing: {}", -net_saving)
    }
}

fn break_even_line(break_even: &BreakEven) -> String {
    match break_even {
        BreakEven::Month(m) => format!(
            "The break even point (month that saving on interest exceeds the refinancing fee) is: {}",
            m
        ),
        BreakEven::NotReached { horizon } => format!(
            "The break even point is not reached within the {}-month refinance horizon",
            horizon
        ),
    }
}

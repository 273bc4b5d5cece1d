use serde_json::Value;

use super::format_scalar;

/// Print the headline figure of a run on one line.
///
/// Refinance runs print the net saving with the break-even month, schedule
/// runs print the fixed payment and the months to payoff, payment runs print
/// the fixed payment alone.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);
    println!("{}", headline(result));
}

fn headline(result: &Value) -> String {
    if let Some(saving) = result.get("net_saving") {
        return match result.pointer("/break_even/month").filter(|m| !m.is_null()) {
            Some(month) => format!(
                "{} (break even month {})",
                format_scalar(saving),
                format_scalar(month)
            ),
            None => format!("{} (no break even)", format_scalar(saving)),
        };
    }

    match (result.get("fixed_payment"), result.get("months")) {
        (Some(payment), Some(months)) => {
            format!("{} x {}", format_scalar(payment), format_scalar(months))
        }
        (Some(payment), None) => format_scalar(payment),
        _ => format_scalar(result),
    }
}

//! Settings for an original-versus-refinance comparison.
//!
//! Field names are snake_case. The human-readable keys used by earlier
//! settings files ("Original Plan", "Interest Rate", ...) are accepted as
//! aliases. Every field is required and unknown fields are rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::extra_payments::OptionalPayments;
use crate::error::RefiError;
use crate::time_value::MAX_TERM_MONTHS;
use crate::types::{Money, Percent};
use crate::RefiResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefinanceSettings {
    #[serde(alias = "Original Plan")]
    pub original: OriginalPlanSettings,
    #[serde(alias = "Refinance")]
    pub refinance: RefinancePlanSettings,
}

/// The loan as originally taken out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OriginalPlanSettings {
    #[serde(alias = "Loan")]
    pub principal: Money,
    #[serde(alias = "Escrow")]
    pub escrow: Money,
    /// Annual interest rate in percent.
    #[serde(alias = "Interest Rate")]
    pub annual_rate: Percent,
    #[serde(alias = "Term")]
    pub term_months: u32,
    #[serde(alias = "Optional Payments")]
    pub optional_payments: OptionalPayments,
}

/// The replacement loan. Its principal is the original loan's balance at
/// `start_month`, so it is not configured here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefinancePlanSettings {
    #[serde(alias = "Escrow")]
    pub escrow: Money,
    /// Annual interest rate in percent.
    #[serde(alias = "Interest Rate")]
    pub annual_rate: Percent,
    #[serde(alias = "Term")]
    pub term_months: u32,
    /// Zero-based row of the original schedule whose balance is refinanced.
    #[serde(alias = "Start")]
    pub start_month: u32,
    /// One-time refinancing fee.
    #[serde(alias = "Fee")]
    pub fee: Money,
    #[serde(alias = "Optional Payments")]
    pub optional_payments: OptionalPayments,
}

impl RefinanceSettings {
    /// Check numeric preconditions before any schedule is generated.
    pub fn validate(&self) -> RefiResult<()> {
        let o = &self.original;
        let r = &self.refinance;

        if o.principal <= Decimal::ZERO {
            return Err(RefiError::invalid(
                "original.principal",
                "Loan principal must be positive",
            ));
        }
        for (field, term) in [
            ("original.term_months", o.term_months),
            ("refinance.term_months", r.term_months),
        ] {
            if term == 0 {
                return Err(RefiError::invalid(field, "Term must be at least one month"));
            }
            if term > MAX_TERM_MONTHS {
                return Err(RefiError::invalid(
                    field,
                    format!("Term cannot exceed {MAX_TERM_MONTHS} months"),
                ));
            }
        }
        for (field, rate) in [
            ("original.annual_rate", o.annual_rate),
            ("refinance.annual_rate", r.annual_rate),
        ] {
            if rate < Decimal::ZERO {
                return Err(RefiError::invalid(field, "Interest rate cannot be negative"));
            }
        }
        for (field, amount) in [
            ("original.escrow", o.escrow),
            ("refinance.escrow", r.escrow),
            ("refinance.fee", r.fee),
            ("original.optional_payments.recurring", o.optional_payments.recurring),
            ("refinance.optional_payments.recurring", r.optional_payments.recurring),
        ] {
            if amount < Decimal::ZERO {
                return Err(RefiError::invalid(field, "Amount cannot be negative"));
            }
        }
        if r.start_month >= o.term_months {
            return Err(RefiError::invalid(
                "refinance.start_month",
                format!(
                    "Start month {} is outside the original {}-month term",
                    r.start_month, o.term_months
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    const SNAKE_CASE_JSON: &str = r#"{
        "original": {
            "principal": "300000",
            "escrow": "350",
            "annual_rate": "4.5",
            "term_months": 360,
            "optional_payments": { "recurring": "0", "custom": { "13": "5000" } }
        },
        "refinance": {
            "escrow": "350",
            "annual_rate": "3.0",
            "term_months": 180,
            "start_month": 24,
            "fee": "4000",
            "optional_payments": { "recurring": "100", "custom": {} }
        }
    }"#;

    const LEGACY_YAML: &str = r#"
Original Plan:
  Loan: 300000
  Escrow: 350
  Interest Rate: 4.5
  Term: 360
  Optional Payments:
    Recurrent: 0
    Custom:
      13: 5000
Refinance:
  Escrow: 350
  Interest Rate: 3.0
  Term: 180
  Start: 24
  Fee: 4000
  Optional Payments:
    Recurrent: 100
    Custom: {}
"#;

    #[test]
    fn test_snake_case_json_parses() {
        let s: RefinanceSettings = serde_json::from_str(SNAKE_CASE_JSON).unwrap();
        assert_eq!(s.original.principal, dec!(300000));
        assert_eq!(
            s.original.optional_payments.custom,
            BTreeMap::from([(13, dec!(5000))])
        );
        assert_eq!(s.refinance.start_month, 24);
        s.validate().unwrap();
    }

    #[test]
    fn test_legacy_yaml_keys_parse_to_same_settings() {
        let json: RefinanceSettings = serde_json::from_str(SNAKE_CASE_JSON).unwrap();
        let yaml: RefinanceSettings = serde_yaml::from_str(LEGACY_YAML).unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_missing_field_rejected() {
        let broken = SNAKE_CASE_JSON.replace(r#""fee": "4000","#, "");
        assert!(serde_json::from_str::<RefinanceSettings>(&broken).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let broken = SNAKE_CASE_JSON.replace(r#""fee": "4000","#, r#""fees": "4000","#);
        assert!(serde_json::from_str::<RefinanceSettings>(&broken).is_err());
    }

    #[test]
    fn test_validate_start_outside_term() {
        let mut s: RefinanceSettings = serde_json::from_str(SNAKE_CASE_JSON).unwrap();
        s.refinance.start_month = 360;
        let err = s.validate().unwrap_err();
        assert!(
            matches!(err, RefiError::InvalidInput { ref field, .. } if field == "refinance.start_month")
        );
    }

    #[test]
    fn test_validate_negative_fee() {
        let mut s: RefinanceSettings = serde_json::from_str(SNAKE_CASE_JSON).unwrap();
        s.refinance.fee = dec!(-1);
        assert!(s.validate().is_err());
    }
}

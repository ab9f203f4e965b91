use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, Result};
use crate::input;
use crate::types::PercentageMode;

/// result of one percentage question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageResult {
    pub mode: PercentageMode,
    pub x: Decimal,
    pub y: Decimal,
    pub value: Decimal,
    /// two decimals; changes carry an explicit sign and a `%`
    pub formatted: String,
    pub summary: String,
}

impl PercentageResult {
    /// plain-text block for copying out of the calculator
    pub fn export_text(&self) -> String {
        format!(
            "Mode: {}\nResult: {}\nSummary: {}",
            self.mode.label(),
            self.formatted,
            self.summary
        )
    }
}

/// y·x/100
pub fn percent_of(x: Decimal, y: Decimal) -> Result<Decimal> {
    y.checked_mul(x)
        .map(|product| product / Decimal::ONE_HUNDRED)
        .ok_or_else(|| CalcError::overflow("percentage"))
}

/// (x/y)·100
pub fn is_what_percent(x: Decimal, y: Decimal) -> Result<Decimal> {
    if y.is_zero() {
        return Err(CalcError::division_by_zero("percentage of zero"));
    }
    x.checked_div(y)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| CalcError::overflow("percentage"))
}

/// ((y − x)/|x|)·100, positive for an increase
pub fn percentage_change(x: Decimal, y: Decimal) -> Result<Decimal> {
    if x.is_zero() {
        return Err(CalcError::division_by_zero("percentage change from zero"));
    }
    y.checked_sub(x)
        .and_then(|delta| delta.checked_div(x.abs()))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| CalcError::overflow("percentage change"))
}

/// evaluate `mode`; both inputs must be non-negative
pub fn calculate_percentage(mode: PercentageMode, x: Decimal, y: Decimal) -> Result<PercentageResult> {
    for (field, value) in [("first value", x), ("second value", y)] {
        if value < Decimal::ZERO {
            return Err(CalcError::InvalidNumber {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }

    let (value, formatted) = match mode {
        PercentageMode::PercentOf => {
            let value = percent_of(x, y)?;
            (value, format!("{:.2}", value))
        }
        PercentageMode::IsWhatPercent => {
            let value = is_what_percent(x, y)?;
            (value, format!("{:.2}", value))
        }
        PercentageMode::IncreaseDecrease => {
            let value = percentage_change(x, y)?;
            let sign = if value > Decimal::ZERO { "+" } else { "" };
            (value, format!("{sign}{:.2}%", value))
        }
    };

    let (xs, ys) = (x.normalize(), y.normalize());
    let summary = match mode {
        PercentageMode::PercentOf => format!("{xs}% of {ys} = {formatted}"),
        PercentageMode::IsWhatPercent => format!("{xs} is {formatted}% of {ys}"),
        PercentageMode::IncreaseDecrease => format!("Change from {xs} to {ys} = {formatted}"),
    };

    debug!(?mode, %x, %y, %value, "percentage computed");
    Ok(PercentageResult {
        mode,
        x,
        y,
        value,
        formatted,
        summary,
    })
}

/// raw percentage form; also the persisted snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PercentageForm {
    pub mode: PercentageMode,
    pub input1: String,
    pub input2: String,
    pub result: String,
    pub summary: String,
    pub show_result: bool,
}

impl PercentageForm {
    pub fn parse(&self) -> Result<(Decimal, Decimal)> {
        Ok((
            input::parse_decimal("first value", &self.input1)?,
            input::parse_decimal("second value", &self.input2)?,
        ))
    }

    /// recompute and mirror the outcome into the snapshot fields
    pub fn calculate(&mut self) -> Result<PercentageResult> {
        let outcome = self
            .parse()
            .and_then(|(x, y)| calculate_percentage(self.mode, x, y));
        match &outcome {
            Ok(result) => {
                self.result = result.formatted.clone();
                self.summary = result.summary.clone();
                self.show_result = true;
            }
            Err(_) => {
                self.result.clear();
                self.summary.clear();
                self.show_result = false;
            }
        }
        outcome
    }

    /// switching modes discards the previous answer
    pub fn set_mode(&mut self, mode: PercentageMode) {
        self.mode = mode;
        self.result.clear();
        self.summary.clear();
        self.show_result = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        let result = calculate_percentage(PercentageMode::PercentOf, dec!(20), dec!(50)).unwrap();
        assert_eq!(result.value, dec!(10));
        assert_eq!(result.summary, "20% of 50 = 10.00");
    }

    #[test]
    fn test_is_what_percent() {
        let result = calculate_percentage(PercentageMode::IsWhatPercent, dec!(10), dec!(50)).unwrap();
        assert_eq!(result.value, dec!(20));
        assert_eq!(result.summary, "10 is 20.00% of 50");
    }

    #[test]
    fn test_increase_and_decrease() {
        let up = calculate_percentage(PercentageMode::IncreaseDecrease, dec!(50), dec!(75)).unwrap();
        assert_eq!(up.formatted, "+50.00%");
        assert_eq!(up.summary, "Change from 50 to 75 = +50.00%");

        let down = calculate_percentage(PercentageMode::IncreaseDecrease, dec!(75), dec!(50)).unwrap();
        assert_eq!(down.formatted, "-33.33%");

        let flat = calculate_percentage(PercentageMode::IncreaseDecrease, dec!(40), dec!(40)).unwrap();
        assert_eq!(flat.formatted, "0.00%");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            calculate_percentage(PercentageMode::IsWhatPercent, dec!(10), dec!(0)),
            Err(CalcError::DivisionByZero {
                operation: "percentage of zero".to_string()
            })
        );
        assert!(matches!(
            calculate_percentage(PercentageMode::IncreaseDecrease, dec!(0), dec!(10)),
            Err(CalcError::DivisionByZero { .. })
        ));
        // percent-of never divides by user input
        assert_eq!(
            calculate_percentage(PercentageMode::PercentOf, dec!(10), dec!(0)).unwrap().value,
            dec!(0)
        );
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(matches!(
            calculate_percentage(PercentageMode::PercentOf, dec!(-1), dec!(50)),
            Err(CalcError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_form_snapshot_fields() {
        let mut form = PercentageForm {
            mode: PercentageMode::IncreaseDecrease,
            input1: "50".to_string(),
            input2: "75".to_string(),
            ..PercentageForm::default()
        };
        form.calculate().unwrap();
        assert_eq!(form.result, "+50.00%");
        assert!(form.show_result);

        let json = serde_json::to_string(&form).unwrap();
        assert!(json.contains("\"showResult\":true"));
        assert!(json.contains("\"mode\":\"increaseDecrease\""));

        form.set_mode(PercentageMode::PercentOf);
        assert!(!form.show_result);
        assert!(form.result.is_empty());
    }

    #[test]
    fn test_export_text() {
        let result = calculate_percentage(PercentageMode::PercentOf, dec!(20), dec!(50)).unwrap();
        assert_eq!(
            result.export_text(),
            "Mode: What is X% of Y?\nResult: 10.00\nSummary: 20% of 50 = 10.00"
        );
    }

    #[test]
    fn test_oversized_inputs_are_an_error() {
        let mut form = PercentageForm {
            mode: PercentageMode::PercentOf,
            input1: "70000000000000000000000000000".to_string(),
            input2: "70000000000000000000000000000".to_string(),
            ..PercentageForm::default()
        };
        assert_eq!(form.calculate(), Err(CalcError::overflow("percentage")));
        assert!(!form.show_result);

        form.set_mode(PercentageMode::IsWhatPercent);
        form.input2 = "0.000001".to_string();
        assert!(matches!(form.calculate(), Err(CalcError::Overflow { .. })));
    }
}

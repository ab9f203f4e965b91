use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{check_tenure_months, CalculatorDefaults};
use crate::decimal::{growth_factor, Money, Rate};
use crate::errors::{CalcError, Result};
use crate::input;
use crate::types::InterestType;

/// principal, rate and tenure of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub tenure_months: u32,
    pub interest_type: InterestType,
}

/// installment and what it adds up to over the tenure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiSummary {
    pub emi: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

impl LoanTerms {
    /// reducing-balance loan
    pub fn new(principal: Money, annual_rate: Rate, tenure_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            tenure_months,
            interest_type: InterestType::Compound,
        }
    }

    /// loan whose tenure is given in whole years
    ///
    /// an out-of-range year count saturates and is rejected by [`LoanTerms::validate`]
    pub fn from_years(principal: Money, annual_rate: Rate, tenure_years: u32) -> Self {
        Self::new(principal, annual_rate, tenure_years.saturating_mul(12))
    }

    pub fn with_interest_type(mut self, interest_type: InterestType) -> Self {
        self.interest_type = interest_type;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(CalcError::non_positive("principal"));
        }
        if self.tenure_months == 0 {
            return Err(CalcError::non_positive("tenure"));
        }
        check_tenure_months("loan tenure", self.tenure_months)?;
        if self.annual_rate.is_negative() {
            return Err(CalcError::InvalidNumber {
                field: "interest rate".to_string(),
                value: self.annual_rate.to_string(),
            });
        }
        Ok(())
    }

    /// monthly installment under this loan's interest type
    pub fn emi(&self) -> Result<Money> {
        match self.interest_type {
            InterestType::Compound => {
                calculate_emi(self.principal, self.annual_rate, self.tenure_months)
            }
            InterestType::Simple => {
                simple_interest_emi(self.principal, self.annual_rate, self.tenure_months)
            }
        }
    }

    pub fn summary(&self) -> Result<EmiSummary> {
        let emi = self.emi()?;
        let total_payment = emi
            .checked_mul(Decimal::from(self.tenure_months))
            .ok_or_else(|| CalcError::overflow("total loan payment"))?;
        let summary = EmiSummary {
            emi,
            total_payment,
            total_interest: total_payment - self.principal,
        };
        debug!(
            principal = %self.principal,
            rate = %self.annual_rate,
            months = self.tenure_months,
            emi = %summary.emi,
            "emi summary"
        );
        Ok(summary)
    }
}

/// reducing-balance EMI: P·r·(1+r)^n / ((1+r)^n − 1) with r the monthly rate
///
/// a zero rate degenerates to principal / months
pub fn calculate_emi(principal: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    LoanTerms::new(principal, annual_rate, months).validate()?;

    let r = annual_rate.monthly_rate();
    if r.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let overflow = || CalcError::overflow("EMI");
    let compound = growth_factor(r, months).ok_or_else(overflow)?;
    let numerator = principal
        .as_decimal()
        .checked_mul(r.as_decimal())
        .and_then(|n| n.checked_mul(compound))
        .ok_or_else(overflow)?;
    let denominator = compound - Decimal::ONE;

    numerator
        .checked_div(denominator)
        .map(Money::from_decimal)
        .ok_or_else(overflow)
}

/// flat-rate EMI: (P + P·rate·years) / months
pub fn simple_interest_emi(principal: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    LoanTerms::new(principal, annual_rate, months).validate()?;

    let overflow = || CalcError::overflow("flat-rate EMI");
    let years = Decimal::from(months) / Decimal::from(12);
    let interest = annual_rate
        .as_decimal()
        .checked_mul(years)
        .and_then(|share| principal.checked_mul(share))
        .ok_or_else(overflow)?;
    principal
        .checked_add(interest)
        .and_then(|total| total.checked_div(Decimal::from(months)))
        .ok_or_else(overflow)
}

/// largest principal an installment of `emi` can service:
/// EMI · ((1+r)^n − 1) / (r·(1+r)^n)
///
/// zero when the rate, tenure or installment is not positive
pub fn max_principal_for_emi(emi: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    let r = annual_rate.monthly_rate();
    if !emi.is_positive() || !r.is_positive() || months == 0 {
        return Ok(Money::ZERO);
    }
    check_tenure_months("loan tenure", months)?;

    let overflow = || CalcError::overflow("eligible loan amount");
    let compound = growth_factor(r, months).ok_or_else(overflow)?;
    let numerator = compound - Decimal::ONE;
    let denominator = r.as_decimal().checked_mul(compound).ok_or_else(overflow)?;

    emi.as_decimal()
        .checked_mul(numerator)
        .and_then(|n| n.checked_div(denominator))
        .map(Money::from_decimal)
        .ok_or_else(overflow)
}

/// raw EMI form, also its session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanEmiForm {
    pub loan_amount: String,
    pub interest_rate: String,
    pub tenure_months: String,
    pub interest_type: InterestType,
}

impl Default for LoanEmiForm {
    fn default() -> Self {
        let defaults = CalculatorDefaults::default();
        Self {
            loan_amount: String::new(),
            interest_rate: defaults.emi_rate.to_string(),
            tenure_months: defaults.emi_tenure_months.to_string(),
            interest_type: InterestType::default(),
        }
    }
}

impl LoanEmiForm {
    pub fn parse(&self) -> Result<LoanTerms> {
        let terms = LoanTerms {
            principal: input::parse_positive_money("loan amount", &self.loan_amount)?,
            annual_rate: input::parse_rate("interest rate", &self.interest_rate)?,
            tenure_months: input::parse_count("loan tenure", &self.tenure_months)?,
            interest_type: self.interest_type,
        };
        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(p: Decimal) -> Rate {
        Rate::from_percentage(p)
    }

    #[test]
    fn test_emi_calculation() {
        // 10 lakh at 8.5% for 20 years
        let emi = calculate_emi(Money::from_major(1_000_000), rate(dec!(8.5)), 240).unwrap();
        assert_eq!(emi.round_dp(2), Money::from_str_exact("8678.23").unwrap());
    }

    #[test]
    fn test_one_year_loan() {
        let emi = calculate_emi(Money::from_major(100_000), rate(dec!(12)), 12).unwrap();
        assert_eq!(emi.round_dp(2), Money::from_str_exact("8884.88").unwrap());
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let terms = LoanTerms::new(Money::from_major(120_000), Rate::ZERO, 12);
        let summary = terms.summary().unwrap();
        assert_eq!(summary.emi, Money::from_major(10_000));
        assert_eq!(summary.total_payment, Money::from_major(120_000));
        assert_eq!(summary.total_interest, Money::ZERO);
    }

    #[test]
    fn test_total_payment_covers_principal() {
        let principals = [10_000, 250_000, 5_000_000];
        let rates = [dec!(0.5), dec!(7), dec!(10.75), dec!(24)];
        let tenures = [1, 6, 60, 360];

        for p in principals {
            for r in rates {
                for n in tenures {
                    let terms = LoanTerms::new(Money::from_major(p), rate(r), n);
                    let summary = terms.summary().unwrap();
                    assert!(summary.total_payment > terms.principal, "{p} {r} {n}");
                    assert!(summary.total_interest.is_positive());
                }
            }
        }
    }

    #[test]
    fn test_max_principal_inverts_emi() {
        for (p, r, n) in [
            (500_000, dec!(9), 60),
            (2_500_000, dec!(8.4), 240),
            (75_000, dec!(15.5), 18),
        ] {
            let principal = Money::from_major(p);
            let emi = calculate_emi(principal, rate(r), n).unwrap();
            let recovered = max_principal_for_emi(emi, rate(r), n).unwrap();
            assert!((recovered - principal).abs() < Money::from_str_exact("0.01").unwrap());
        }
    }

    #[test]
    fn test_max_principal_degenerate_inputs() {
        let emi = Money::from_major(10_000);
        assert_eq!(max_principal_for_emi(emi, Rate::ZERO, 120), Ok(Money::ZERO));
        assert_eq!(max_principal_for_emi(emi, rate(dec!(9)), 0), Ok(Money::ZERO));
        assert_eq!(max_principal_for_emi(Money::ZERO, rate(dec!(9)), 120), Ok(Money::ZERO));
    }

    #[test]
    fn test_simple_interest_emi() {
        // 1 lakh at 10% flat for 2 years: 20,000 interest over 24 months
        let terms = LoanTerms::from_years(Money::from_major(100_000), rate(dec!(10)), 2)
            .with_interest_type(InterestType::Simple);
        let summary = terms.summary().unwrap();
        assert_eq!(summary.emi, Money::from_major(5_000));
        assert_eq!(summary.total_interest, Money::from_major(20_000));
    }

    #[test]
    fn test_flat_rate_costs_more_than_reducing() {
        let base = LoanTerms::from_years(Money::from_major(300_000), rate(dec!(11)), 3);
        let flat = base.with_interest_type(InterestType::Simple);
        assert!(flat.emi().unwrap() > base.emi().unwrap());
    }

    #[test]
    fn test_invalid_terms() {
        assert_eq!(
            calculate_emi(Money::ZERO, rate(dec!(8)), 12),
            Err(CalcError::NonPositiveValue { field: "principal".to_string() })
        );
        assert_eq!(
            calculate_emi(Money::from_major(1_000), rate(dec!(8)), 0),
            Err(CalcError::NonPositiveValue { field: "tenure".to_string() })
        );
        assert!(calculate_emi(Money::from_major(1_000), rate(dec!(-1)), 12).is_err());
    }

    #[test]
    fn test_form_parsing() {
        let form = LoanEmiForm {
            loan_amount: "500000".to_string(),
            interest_rate: "8.5".to_string(),
            tenure_months: "12".to_string(),
            interest_type: InterestType::Compound,
        };
        let terms = form.parse().unwrap();
        assert_eq!(terms.principal, Money::from_major(500_000));
        assert_eq!(terms.annual_rate, rate(dec!(8.5)));

        let blank = LoanEmiForm::default();
        assert!(blank.parse().unwrap_err().is_missing_input());
    }

    #[test]
    fn test_default_form_uses_calculator_defaults() {
        let form = LoanEmiForm {
            loan_amount: "200000".to_string(),
            ..LoanEmiForm::default()
        };
        let terms = form.parse().unwrap();
        assert_eq!(terms.annual_rate, rate(dec!(8.5)));
        assert_eq!(terms.tenure_months, 12);
        assert_eq!(terms.interest_type, InterestType::Compound);
    }

    #[test]
    fn test_oversized_tenure_is_an_error() {
        assert!(matches!(
            calculate_emi(Money::from_major(100_000), rate(dec!(12)), 10_000),
            Err(CalcError::InvalidNumber { .. })
        ));

        let form = LoanEmiForm {
            loan_amount: "100000".to_string(),
            tenure_months: "4000000000".to_string(),
            ..LoanEmiForm::default()
        };
        assert!(form.parse().unwrap().summary().is_err());

        let years = LoanTerms::from_years(Money::from_major(100_000), rate(dec!(9)), 400_000_000);
        assert_eq!(years.tenure_months, u32::MAX);
        assert!(years.emi().is_err());
    }

    #[test]
    fn test_oversized_rate_is_an_error() {
        let form = LoanEmiForm {
            loan_amount: "100000".to_string(),
            interest_rate: "1000000".to_string(),
            tenure_months: "1200".to_string(),
            ..LoanEmiForm::default()
        };
        assert_eq!(
            form.parse().unwrap().emi(),
            Err(CalcError::Overflow { operation: "EMI".to_string() })
        );

        let flat = LoanTerms::new(Money::from_decimal(Decimal::MAX), rate(dec!(50)), 1_200)
            .with_interest_type(InterestType::Simple);
        assert!(matches!(flat.emi(), Err(CalcError::Overflow { .. })));

        assert!(max_principal_for_emi(Money::from_major(30_000), rate(dec!(1000000)), 1_200).is_err());
    }
}

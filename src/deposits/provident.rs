use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CalculatorDefaults, MAX_TENURE_YEARS};
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::input;

/// running position at the end of a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyBalance {
    pub year: u32,
    pub corpus: Money,
    pub total_contributed: Money,
    pub interest_to_date: Money,
}

/// year-by-year reinvestment: corpus = (corpus + contribution)·(1 + r)
///
/// a plain iterator over [`YearlyBalance`]; clone it to restart. an
/// overflowing year yields one error and ends the run
#[derive(Debug, Clone)]
pub struct YearwiseAccumulation {
    yearly_contribution: Money,
    annual_rate: Rate,
    years: u32,
    year: u32,
    corpus: Money,
    total: Money,
}

impl YearwiseAccumulation {
    pub fn new(yearly_contribution: Money, annual_rate: Rate, years: u32) -> Self {
        Self {
            yearly_contribution,
            annual_rate,
            years,
            year: 0,
            corpus: Money::ZERO,
            total: Money::ZERO,
        }
    }
}

impl YearwiseAccumulation {
    pub fn remaining_years(&self) -> u32 {
        self.years - self.year
    }

    fn advance(&mut self) -> Option<YearlyBalance> {
        let growth = Decimal::ONE.checked_add(self.annual_rate.as_decimal())?;
        let corpus = self.corpus.checked_add(self.yearly_contribution)?.checked_mul(growth)?;
        let total = self.total.checked_add(self.yearly_contribution)?;

        self.year += 1;
        self.corpus = corpus;
        self.total = total;
        Some(YearlyBalance {
            year: self.year,
            corpus,
            total_contributed: total,
            interest_to_date: corpus - total,
        })
    }
}

impl Iterator for YearwiseAccumulation {
    type Item = Result<YearlyBalance>;

    fn next(&mut self) -> Option<Result<YearlyBalance>> {
        if self.year >= self.years {
            return None;
        }
        match self.advance() {
            Some(balance) => Some(Ok(balance)),
            None => {
                self.year = self.years;
                Some(Err(CalcError::overflow("fund projection")))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_years() as usize;
        (remaining.min(1), Some(remaining))
    }
}

/// full projection table; the last row is the maturity summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundProjection {
    pub rows: Vec<YearlyBalance>,
}

impl FundProjection {
    pub fn final_balance(&self) -> Option<&YearlyBalance> {
        self.rows.last()
    }

    pub fn maturity(&self) -> Money {
        self.final_balance().map(|b| b.corpus).unwrap_or(Money::ZERO)
    }

    pub fn total_contributed(&self) -> Money {
        self.final_balance()
            .map(|b| b.total_contributed)
            .unwrap_or(Money::ZERO)
    }

    pub fn total_interest(&self) -> Money {
        self.final_balance()
            .map(|b| b.interest_to_date)
            .unwrap_or(Money::ZERO)
    }
}

/// public provident fund with a fixed yearly contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpfPlan {
    pub yearly_contribution: Money,
    pub annual_rate: Rate,
    pub tenure_years: u32,
}

impl PpfPlan {
    pub fn accumulation(&self) -> Result<YearwiseAccumulation> {
        if !self.yearly_contribution.is_positive() {
            return Err(CalcError::non_positive("annual contribution"));
        }
        require_rate_and_years(self.annual_rate, self.tenure_years)?;
        Ok(YearwiseAccumulation::new(
            self.yearly_contribution,
            self.annual_rate,
            self.tenure_years,
        ))
    }

    pub fn project(&self) -> Result<FundProjection> {
        let rows = self.accumulation()?.collect::<Result<Vec<_>>>()?;
        let projection = FundProjection { rows };
        debug!(maturity = %projection.maturity(), years = self.tenure_years, "ppf projection");
        Ok(projection)
    }
}

/// employee provident fund; contributions are a share of a constant salary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpfPlan {
    pub monthly_salary: Money,
    pub employee_share: Rate,
    pub employer_share: Rate,
    pub annual_rate: Rate,
    pub years: u32,
}

impl EpfPlan {
    /// salary × 12 × (employee + employer share)
    pub fn yearly_contribution(&self) -> Result<Money> {
        self.employee_share
            .as_decimal()
            .checked_add(self.employer_share.as_decimal())
            .and_then(|share| share.checked_mul(Decimal::from(12)))
            .and_then(|share| self.monthly_salary.checked_mul(share))
            .ok_or_else(|| CalcError::overflow("yearly EPF contribution"))
    }

    pub fn accumulation(&self) -> Result<YearwiseAccumulation> {
        if !self.monthly_salary.is_positive() {
            return Err(CalcError::non_positive("monthly salary"));
        }
        if !self.employee_share.is_positive() {
            return Err(CalcError::non_positive("employee contribution"));
        }
        if !self.employer_share.is_positive() {
            return Err(CalcError::non_positive("employer contribution"));
        }
        require_rate_and_years(self.annual_rate, self.years)?;
        Ok(YearwiseAccumulation::new(
            self.yearly_contribution()?,
            self.annual_rate,
            self.years,
        ))
    }

    pub fn project(&self) -> Result<FundProjection> {
        let rows = self.accumulation()?.collect::<Result<Vec<_>>>()?;
        let projection = FundProjection { rows };
        debug!(maturity = %projection.maturity(), years = self.years, "epf projection");
        Ok(projection)
    }
}

fn require_rate_and_years(rate: Rate, years: u32) -> Result<()> {
    if !rate.is_positive() {
        return Err(CalcError::non_positive("interest rate"));
    }
    if years == 0 {
        return Err(CalcError::non_positive("tenure"));
    }
    if years > MAX_TENURE_YEARS {
        return Err(CalcError::InvalidNumber {
            field: format!("tenure (at most {MAX_TENURE_YEARS} years)"),
            value: years.to_string(),
        });
    }
    Ok(())
}

/// raw PPF form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PpfForm {
    pub contribution: String,
    pub rate: String,
    pub tenure: String,
}

impl Default for PpfForm {
    fn default() -> Self {
        let defaults = CalculatorDefaults::default();
        Self {
            contribution: String::new(),
            rate: defaults.ppf_rate.to_string(),
            tenure: defaults.ppf_tenure_years.to_string(),
        }
    }
}

impl PpfForm {
    pub fn parse(&self) -> Result<PpfPlan> {
        Ok(PpfPlan {
            yearly_contribution: input::parse_positive_money("annual contribution", &self.contribution)?,
            annual_rate: input::parse_rate("interest rate", &self.rate)?,
            tenure_years: input::parse_count("tenure", &self.tenure)?,
        })
    }
}

/// raw EPF form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EpfForm {
    pub salary: String,
    pub employee_percent: String,
    pub employer_percent: String,
    pub rate: String,
    pub years: String,
}

impl Default for EpfForm {
    fn default() -> Self {
        let defaults = CalculatorDefaults::default();
        Self {
            salary: String::new(),
            employee_percent: defaults.epf_employee_percent.to_string(),
            employer_percent: defaults.epf_employer_percent.to_string(),
            rate: defaults.epf_rate.to_string(),
            years: defaults.epf_years.to_string(),
        }
    }
}

impl EpfForm {
    pub fn parse(&self) -> Result<EpfPlan> {
        Ok(EpfPlan {
            monthly_salary: input::parse_positive_money("monthly salary", &self.salary)?,
            employee_share: input::parse_rate("employee contribution", &self.employee_percent)?,
            employer_share: input::parse_rate("employer contribution", &self.employer_percent)?,
            annual_rate: input::parse_rate("interest rate", &self.rate)?,
            years: input::parse_count("number of years", &self.years)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_recurrence_by_hand() {
        let rows = YearwiseAccumulation::new(Money::from_major(1_000), Rate::from_percentage(dec!(10)), 3)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].corpus, Money::from_major(1_100));
        assert_eq!(rows[1].corpus, Money::from_major(2_310));
        assert_eq!(rows[2].corpus, Money::from_str_exact("3641").unwrap());
        assert_eq!(rows[2].total_contributed, Money::from_major(3_000));
        assert_eq!(rows[2].interest_to_date, Money::from_major(641));
    }

    #[test]
    fn test_restartable() {
        let accumulation = YearwiseAccumulation::new(Money::from_major(500), Rate::from_percentage(dec!(8)), 4);
        assert_eq!(accumulation.remaining_years(), 4);
        let first: Vec<_> = accumulation.clone().collect();
        let second: Vec<_> = accumulation.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ppf_fifteen_years() {
        let plan = PpfPlan {
            yearly_contribution: Money::from_major(150_000),
            annual_rate: Rate::from_percentage(dec!(7.1)),
            tenure_years: 15,
        };
        let projection = plan.project().unwrap();
        assert_eq!(projection.rows.len(), 15);
        assert_eq!(projection.total_contributed(), Money::from_major(2_250_000));
        assert_eq!(projection.maturity().round_dp(0), Money::from_major(4_068_209));
        assert_eq!(
            projection.total_interest(),
            projection.maturity() - projection.total_contributed()
        );
    }

    #[test]
    fn test_epf_contribution() {
        let plan = EpfPlan {
            monthly_salary: Money::from_major(50_000),
            employee_share: Rate::from_percentage(dec!(12)),
            employer_share: Rate::from_percentage(dec!(12)),
            annual_rate: Rate::from_percentage(dec!(8.1)),
            years: 2,
        };
        assert_eq!(plan.yearly_contribution().unwrap(), Money::from_major(144_000));
        let projection = plan.project().unwrap();
        // (144000 * 1.081 + 144000) * 1.081
        assert_eq!(projection.maturity(), Money::from_str_exact("323936.784").unwrap());
    }

    #[test]
    fn test_guards() {
        let plan = PpfPlan {
            yearly_contribution: Money::from_major(1_000),
            annual_rate: Rate::ZERO,
            tenure_years: 15,
        };
        assert!(plan.project().is_err());

        let form = EpfForm {
            salary: "40000".to_string(),
            employee_percent: "12".to_string(),
            employer_percent: "0".to_string(),
            rate: "8.1".to_string(),
            years: "10".to_string(),
        };
        assert_eq!(
            form.parse().unwrap().project(),
            Err(CalcError::NonPositiveValue { field: "employer contribution".to_string() })
        );
    }

    #[test]
    fn test_default_forms_use_calculator_defaults() {
        let ppf = PpfForm::default();
        assert_eq!((ppf.rate.as_str(), ppf.tenure.as_str()), ("7.1", "15"));
        let ppf = PpfForm {
            contribution: "150000".to_string(),
            ..ppf
        };
        let plan = ppf.parse().unwrap();
        assert_eq!(plan.annual_rate, Rate::from_percentage(dec!(7.1)));
        assert_eq!(plan.tenure_years, 15);

        let epf = EpfForm {
            salary: "50000".to_string(),
            ..EpfForm::default()
        };
        let plan = epf.parse().unwrap();
        assert_eq!(plan.employee_share, Rate::from_percentage(dec!(12)));
        assert_eq!(plan.employer_share, Rate::from_percentage(dec!(12)));
        assert_eq!(plan.annual_rate, Rate::from_percentage(dec!(8.1)));
        assert_eq!(plan.years, 15);

        // an empty snapshot restores the same defaults
        let restored: PpfForm = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, PpfForm::default());
    }

    #[test]
    fn test_oversized_tenure_is_an_error() {
        let form = PpfForm {
            contribution: "150000".to_string(),
            tenure: "800".to_string(),
            ..PpfForm::default()
        };
        assert!(matches!(
            form.parse().unwrap().project(),
            Err(CalcError::InvalidNumber { .. })
        ));

        let form = EpfForm {
            salary: "50000".to_string(),
            years: "4000000000".to_string(),
            ..EpfForm::default()
        };
        assert!(form.parse().unwrap().project().is_err());
    }

    #[test]
    fn test_oversized_rate_is_an_error() {
        let form = PpfForm {
            contribution: "150000".to_string(),
            rate: "1000000".to_string(),
            tenure: "100".to_string(),
        };
        assert_eq!(
            form.parse().unwrap().project(),
            Err(CalcError::overflow("fund projection"))
        );

        let mut run = YearwiseAccumulation::new(Money::from_major(150_000), Rate::from_percentage(dec!(1000000)), 100);
        let produced: Vec<_> = run.by_ref().collect();
        assert!(produced.last().unwrap().is_err());
        assert!(produced[..produced.len() - 1].iter().all(|row| row.is_ok()));
        assert_eq!(run.next(), None);

        let form = EpfForm {
            salary: "50000000000000000000000000000".to_string(),
            ..EpfForm::default()
        };
        assert_eq!(
            form.parse().unwrap().yearly_contribution(),
            Err(CalcError::overflow("yearly EPF contribution"))
        );
    }
}

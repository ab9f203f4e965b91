use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::check_tenure_years;
use crate::decimal::{Money, Rate};
use crate::deposits::DepositMaturity;
use crate::errors::{CalcError, Result};
use crate::input;

/// fixed monthly installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringDepositPlan {
    pub monthly_deposit: Money,
    pub annual_rate: Rate,
    pub tenure_years: Decimal,
}

impl RecurringDepositPlan {
    /// arithmetic-series maturity: P·n + P·n·(n+1)/2·r, r monthly, n months
    ///
    /// this is the simple-interest approximation, not per-installment
    /// compounding
    pub fn maturity(&self) -> Result<DepositMaturity> {
        if !self.monthly_deposit.is_positive() {
            return Err(CalcError::non_positive("monthly deposit"));
        }
        if !self.annual_rate.is_positive() {
            return Err(CalcError::non_positive("interest rate"));
        }
        if self.tenure_years <= Decimal::ZERO {
            return Err(CalcError::non_positive("tenure"));
        }
        check_tenure_years("tenure", self.tenure_years)?;

        let r = self.annual_rate.monthly_rate().as_decimal();
        let n = self.tenure_years * Decimal::from(12);
        let overflow = || CalcError::overflow("recurring deposit maturity");

        let invested = self.monthly_deposit.checked_mul(n).ok_or_else(overflow)?;
        let interest = (n * (n + Decimal::ONE) / Decimal::TWO)
            .checked_mul(r)
            .and_then(|weight| self.monthly_deposit.checked_mul(weight))
            .ok_or_else(overflow)?;
        let maturity = invested.checked_add(interest).ok_or_else(overflow)?;

        debug!(deposit = %self.monthly_deposit, months = %n, %maturity, "recurring deposit maturity");
        Ok(DepositMaturity::new(invested, maturity))
    }
}

/// raw recurring-deposit form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurringDepositForm {
    pub deposit: String,
    pub rate: String,
    pub tenure: String,
}

impl RecurringDepositForm {
    pub fn parse(&self) -> Result<RecurringDepositPlan> {
        Ok(RecurringDepositPlan {
            monthly_deposit: input::parse_positive_money("monthly deposit", &self.deposit)?,
            annual_rate: input::parse_rate("interest rate", &self.rate)?,
            tenure_years: input::parse_positive("tenure", &self.tenure)?,
        })
    }
}

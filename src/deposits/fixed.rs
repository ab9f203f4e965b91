use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::check_tenure_years;
use crate::decimal::{growth_factor_fractional, Money, Rate};
use crate::deposits::DepositMaturity;
use crate::errors::{CalcError, Result};
use crate::input;

/// how often a fixed deposit compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompoundingFrequency {
    #[default]
    Yearly,
    HalfYearly,
    Quarterly,
    Monthly,
}

impl CompoundingFrequency {
    pub const ALL: [CompoundingFrequency; 4] = [
        CompoundingFrequency::Yearly,
        CompoundingFrequency::HalfYearly,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::Monthly,
    ];

    /// get number of compounding periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Yearly => 1,
            CompoundingFrequency::HalfYearly => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
        }
    }

    pub fn from_periods_per_year(periods: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.periods_per_year() == periods)
            .ok_or_else(|| CalcError::InvalidNumber {
                field: "compounding frequency".to_string(),
                value: periods.to_string(),
            })
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompoundingFrequency::Yearly => "Yearly",
            CompoundingFrequency::HalfYearly => "Half-Yearly",
            CompoundingFrequency::Quarterly => "Quarterly",
            CompoundingFrequency::Monthly => "Monthly",
        }
    }
}

/// lump-sum deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedDepositPlan {
    pub principal: Money,
    pub annual_rate: Rate,
    pub tenure_years: Decimal,
    pub frequency: CompoundingFrequency,
}

impl FixedDepositPlan {
    /// P·(1 + r/f)^(f·t)
    pub fn maturity(&self) -> Result<DepositMaturity> {
        if !self.principal.is_positive() {
            return Err(CalcError::non_positive("principal"));
        }
        if !self.annual_rate.is_positive() {
            return Err(CalcError::non_positive("interest rate"));
        }
        if self.tenure_years <= Decimal::ZERO {
            return Err(CalcError::non_positive("tenure"));
        }
        check_tenure_years("tenure", self.tenure_years)?;

        let periods = self.frequency.periods_per_year();
        let exponent = Decimal::from(periods) * self.tenure_years;
        let maturity = growth_factor_fractional(self.annual_rate.per_period(periods), exponent)
            .and_then(|factor| self.principal.checked_mul(factor))
            .ok_or_else(|| CalcError::overflow("fixed deposit maturity"))?;
        debug!(
            principal = %self.principal,
            rate = %self.annual_rate,
            years = %self.tenure_years,
            frequency = self.frequency.label(),
            %maturity,
            "fixed deposit maturity"
        );
        Ok(DepositMaturity::new(self.principal, maturity))
    }
}

/// raw fixed-deposit form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedDepositForm {
    pub principal: String,
    pub rate: String,
    pub tenure: String,
    pub compounding: CompoundingFrequency,
}

impl FixedDepositForm {
    pub fn parse(&self) -> Result<FixedDepositPlan> {
        Ok(FixedDepositPlan {
            principal: input::parse_positive_money("principal", &self.principal)?,
            annual_rate: input::parse_rate("interest rate", &self.rate)?,
            tenure_years: input::parse_positive("tenure", &self.tenure)?,
            frequency: self.compounding,
        })
    }
}

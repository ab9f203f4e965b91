use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::check_tenure_months;
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::input;
use crate::loans::emi::max_principal_for_emi;

/// share of monthly income lenders allow for all EMIs combined
pub const DEBT_SERVICE_RATIO: Decimal = dec!(0.4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub monthly_income: Money,
    pub existing_emis: Money,
    pub tenure_years: u32,
    pub annual_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanEligibility {
    /// installment still available under the debt-service ratio
    pub eligible_emi: Money,
    /// principal that installment can service over the tenure
    pub eligible_loan: Money,
}

/// maximum EMI budget and loan size for a borrower
pub fn calculate_eligibility(request: &EligibilityRequest) -> Result<LoanEligibility> {
    if !request.monthly_income.is_positive() {
        return Err(CalcError::non_positive("monthly income"));
    }
    if request.tenure_years == 0 {
        return Err(CalcError::non_positive("loan tenure"));
    }
    if request.existing_emis.is_negative() || request.annual_rate.is_negative() {
        return Err(CalcError::InvalidNumber {
            field: "existing EMIs or interest rate".to_string(),
            value: format!("{} / {}", request.existing_emis, request.annual_rate),
        });
    }

    let eligible_emi = (request.monthly_income * DEBT_SERVICE_RATIO - request.existing_emis).floor_zero();
    let months = request
        .tenure_years
        .checked_mul(12)
        .ok_or_else(|| CalcError::InvalidNumber {
            field: "loan tenure".to_string(),
            value: request.tenure_years.to_string(),
        })?;
    check_tenure_months("loan tenure", months)?;
    let eligible_loan = max_principal_for_emi(eligible_emi, request.annual_rate, months)?;

    debug!(
        income = %request.monthly_income,
        existing = %request.existing_emis,
        %eligible_emi,
        %eligible_loan,
        "loan eligibility"
    );
    Ok(LoanEligibility {
        eligible_emi,
        eligible_loan,
    })
}

/// raw eligibility form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanEligibilityForm {
    pub income: String,
    pub existing_emi: String,
    pub tenure: String,
    pub rate: String,
}

impl LoanEligibilityForm {
    pub fn parse(&self) -> Result<EligibilityRequest> {
        Ok(EligibilityRequest {
            monthly_income: input::parse_positive_money("monthly income", &self.income)?,
            existing_emis: input::parse_optional_money("existing EMIs", &self.existing_emi)?,
            tenure_years: input::parse_count("loan tenure", &self.tenure)?,
            annual_rate: input::parse_rate("interest rate", &self.rate)?,
        })
    }
}

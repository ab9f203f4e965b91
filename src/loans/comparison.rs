use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::input;
use crate::loans::emi::{EmiSummary, LoanTerms};
use crate::types::InterestType;

/// one loan offer being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub amount: Money,
    pub annual_rate: Rate,
    pub tenure_years: u32,
    pub interest_type: InterestType,
}

impl LoanOffer {
    pub fn new(amount: Money, annual_rate: Rate, tenure_years: u32) -> Self {
        Self {
            amount,
            annual_rate,
            tenure_years,
            interest_type: InterestType::Compound,
        }
    }

    pub fn with_interest_type(mut self, interest_type: InterestType) -> Self {
        self.interest_type = interest_type;
        self
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms::from_years(self.amount, self.annual_rate, self.tenure_years)
            .with_interest_type(self.interest_type)
    }
}

/// an offer with its costs and best-in-class tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferResult {
    /// position in the input list
    pub index: usize,
    pub offer: LoanOffer,
    pub summary: EmiSummary,
    pub lowest_emi: bool,
    pub lowest_total_payment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanComparison {
    pub results: Vec<OfferResult>,
    pub min_emi: Money,
    pub min_total_payment: Money,
}

impl LoanComparison {
    /// offers ordered by EMI, input order breaking ties
    pub fn ranked_by_emi(&self) -> Vec<&OfferResult> {
        let mut ranked: Vec<&OfferResult> = self.results.iter().collect();
        ranked.sort_by_key(|r| r.summary.emi);
        ranked
    }

    /// offers ordered by total amount repaid, input order breaking ties
    pub fn ranked_by_total_cost(&self) -> Vec<&OfferResult> {
        let mut ranked: Vec<&OfferResult> = self.results.iter().collect();
        ranked.sort_by_key(|r| r.summary.total_payment);
        ranked
    }
}

/// cost every offer and tag the cheapest; ties all get the tag
pub fn compare_offers(offers: &[LoanOffer]) -> Result<LoanComparison> {
    if offers.is_empty() {
        return Err(CalcError::missing("loan offers"));
    }

    let summaries = offers
        .iter()
        .enumerate()
        .map(|(i, offer)| offer.terms().summary().map_err(|e| tag_offer(i, e)))
        .collect::<Result<Vec<_>>>()?;

    let min_emi = summaries.iter().map(|s| s.emi).min().unwrap_or(Money::ZERO);
    let min_total_payment = summaries
        .iter()
        .map(|s| s.total_payment)
        .min()
        .unwrap_or(Money::ZERO);

    let results = offers
        .iter()
        .zip(summaries)
        .enumerate()
        .map(|(index, (offer, summary))| OfferResult {
            index,
            offer: *offer,
            summary,
            lowest_emi: summary.emi == min_emi,
            lowest_total_payment: summary.total_payment == min_total_payment,
        })
        .collect();

    debug!(offers = offers.len(), %min_emi, %min_total_payment, "compared loan offers");
    Ok(LoanComparison {
        results,
        min_emi,
        min_total_payment,
    })
}

/// prefix the failing field with its offer number
fn tag_offer(index: usize, error: CalcError) -> CalcError {
    let prefix = |field: String| format!("offer {} {}", index + 1, field);
    match error {
        CalcError::NonPositiveValue { field } => CalcError::NonPositiveValue { field: prefix(field) },
        CalcError::MissingInput { field } => CalcError::MissingInput { field: prefix(field) },
        CalcError::InvalidNumber { field, value } => CalcError::InvalidNumber {
            field: prefix(field),
            value,
        },
        other => other,
    }
}

/// raw fields of one offer row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanOfferForm {
    pub amount: String,
    pub rate: String,
    pub tenure: String,
    pub interest_type: InterestType,
}

impl LoanOfferForm {
    pub fn parse(&self) -> Result<LoanOffer> {
        Ok(LoanOffer {
            amount: input::parse_positive_money("loan amount", &self.amount)?,
            annual_rate: input::parse_rate("interest rate", &self.rate)?,
            tenure_years: input::parse_count("tenure", &self.tenure)?,
            interest_type: self.interest_type,
        })
    }
}

/// parse every row; any incomplete row blocks the comparison
pub fn parse_offers(forms: &[LoanOfferForm]) -> Result<Vec<LoanOffer>> {
    forms
        .iter()
        .enumerate()
        .map(|(i, form)| form.parse().map_err(|e| tag_offer(i, e)))
        .collect()
}

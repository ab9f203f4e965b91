use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DeductionRules, RebateRule, TaxRegimeConfig, TaxSlab};
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::input;
use crate::types::TaxRegime;

/// deductions the taxpayer is claiming; a claim the regime does not offer is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeductionClaims {
    pub standard_deduction: bool,
    pub hra: bool,
    pub section_80c: bool,
    pub nps: bool,
    pub home_loan: bool,
    pub medical_insurance: bool,
    pub employer_nps: bool,
}

impl Default for DeductionClaims {
    fn default() -> Self {
        Self {
            standard_deduction: true,
            hra: false,
            section_80c: false,
            nps: false,
            home_loan: false,
            medical_insurance: false,
            employer_nps: false,
        }
    }
}

impl DeductionClaims {
    pub fn none() -> Self {
        Self {
            standard_deduction: false,
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self {
            standard_deduction: true,
            hra: true,
            section_80c: true,
            nps: true,
            home_loan: true,
            medical_insurance: true,
            employer_nps: true,
        }
    }

    /// sum of every claimed deduction the rules allow
    pub fn total(&self, gross: Money, rules: &DeductionRules) -> Result<Money> {
        let flat = |claimed: bool, amount: Option<Money>| match (claimed, amount) {
            (true, Some(amount)) => amount,
            _ => Money::ZERO,
        };
        let share = |claimed: bool, rate: Option<Rate>| match (claimed, rate) {
            (true, Some(rate)) => gross.apply_rate(rate),
            _ => Money::ZERO,
        };

        [
            flat(self.standard_deduction, rules.standard_deduction),
            share(self.hra, rules.hra_share),
            flat(self.section_80c, rules.section_80c_cap),
            flat(self.nps, rules.nps_cap),
            flat(self.home_loan, rules.home_loan_interest_cap),
            flat(self.medical_insurance, rules.medical_insurance_cap),
            share(self.employer_nps, rules.employer_nps_share),
        ]
        .into_iter()
        .try_fold(Money::ZERO, Money::checked_add)
        .ok_or_else(|| CalcError::overflow("total deductions"))
    }
}

/// tax charged inside one slab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTax {
    pub label: String,
    pub rate: Rate,
    pub taxable_amount: Money,
    pub tax: Money,
}

/// result of walking the slab table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub total_tax: Money,
    pub breakdown: Vec<SlabTax>,
}

/// marginal tax on `taxable_income`, before any rebate
pub fn bracket_tax(taxable_income: Money, slabs: &[TaxSlab]) -> BracketTax {
    let mut remaining = taxable_income;
    let mut total_tax = Money::ZERO;
    let mut breakdown = Vec::new();

    for slab in slabs {
        if !remaining.is_positive() {
            break;
        }
        let slab_amount = slab.width().map_or(remaining, |width| width.min(remaining));
        if slab_amount.is_positive() {
            let tax = slab_amount.apply_rate(slab.rate);
            total_tax += tax;
            breakdown.push(SlabTax {
                label: slab.label(),
                rate: slab.rate,
                taxable_amount: slab_amount,
                tax,
            });
        }
        remaining -= slab_amount;
    }

    BracketTax { total_tax, breakdown }
}

/// rebate for a taxable income at or below the threshold
pub fn rebate_for(taxable_income: Money, tax: Money, rule: Option<&RebateRule>) -> Money {
    match rule {
        Some(rule) if taxable_income <= rule.threshold => tax.min(rule.cap),
        _ => Money::ZERO,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxReport {
    pub regime: TaxRegime,
    pub gross_income: Money,
    pub total_deductions: Money,
    pub taxable_income: Money,
    pub tax_before_rebate: Money,
    pub rebate: Money,
    pub total_tax: Money,
    /// tax as a percentage of gross income
    pub effective_rate: Decimal,
    pub breakdown: Vec<SlabTax>,
}

/// full report: deductions, slab walk, rebate and effective rate
pub fn compute_income_tax(
    gross_income: Money,
    config: &TaxRegimeConfig,
    claims: &DeductionClaims,
) -> Result<IncomeTaxReport> {
    config.validate()?;

    let total_deductions = claims.total(gross_income, &config.deductions)?;
    let taxable_income = (gross_income - total_deductions).floor_zero();

    let bracket = bracket_tax(taxable_income, &config.slabs);
    let rebate = rebate_for(taxable_income, bracket.total_tax, config.rebate.as_ref());
    let total_tax = bracket.total_tax - rebate;

    let effective_rate = if gross_income.is_positive() {
        (total_tax.as_decimal() / gross_income.as_decimal() * Decimal::ONE_HUNDRED).round_dp(4)
    } else {
        Decimal::ZERO
    };

    debug!(
        regime = ?config.regime,
        gross = %gross_income,
        taxable = %taxable_income,
        tax = %total_tax,
        %rebate,
        "income tax computed"
    );

    Ok(IncomeTaxReport {
        regime: config.regime,
        gross_income,
        total_deductions,
        taxable_income,
        tax_before_rebate: bracket.total_tax,
        rebate,
        total_tax,
        effective_rate,
        breakdown: bracket.breakdown,
    })
}

/// raw income tax form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeTaxForm {
    pub income: String,
    pub regime: TaxRegime,
    pub deductions: DeductionClaims,
}

impl Default for IncomeTaxForm {
    fn default() -> Self {
        Self {
            income: String::new(),
            regime: TaxRegime::New,
            deductions: DeductionClaims::default(),
        }
    }
}

impl IncomeTaxForm {
    pub fn parse(&self) -> Result<Money> {
        input::parse_positive_money("annual income", &self.income)
    }

    /// evaluate against the preset for the selected regime
    pub fn calculate(&self) -> Result<IncomeTaxReport> {
        let income = self.parse()?;
        compute_income_tax(income, &TaxRegimeConfig::for_regime(self.regime), &self.deductions)
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::types::{JobCategory, TaxRegime};

/// longest loan, deposit or fund tenure any calculator accepts
pub const MAX_TENURE_YEARS: u32 = 100;
pub const MAX_TENURE_MONTHS: u32 = MAX_TENURE_YEARS * 12;

/// reject tenures longer than [`MAX_TENURE_YEARS`]
pub fn check_tenure_years(field: &str, years: Decimal) -> Result<()> {
    if years > Decimal::from(MAX_TENURE_YEARS) {
        return Err(tenure_too_long(field, &years.to_string()));
    }
    Ok(())
}

/// reject tenures longer than [`MAX_TENURE_MONTHS`]
pub fn check_tenure_months(field: &str, months: u32) -> Result<()> {
    if months > MAX_TENURE_MONTHS {
        return Err(tenure_too_long(field, &months.to_string()));
    }
    Ok(())
}

fn tenure_too_long(field: &str, value: &str) -> CalcError {
    CalcError::InvalidNumber {
        field: format!("{field} (at most {MAX_TENURE_YEARS} years)"),
        value: value.to_string(),
    }
}

/// one marginal income band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub lower_bound: Money,
    /// `None` means the band is open-ended
    pub upper_bound: Option<Money>,
    pub rate: Rate,
}

impl TaxSlab {
    pub fn bounded(lower: i64, upper: i64, rate: Decimal) -> Self {
        Self {
            lower_bound: Money::from_major(lower),
            upper_bound: Some(Money::from_major(upper)),
            rate: Rate::from_decimal(rate),
        }
    }

    pub fn unbounded(lower: i64, rate: Decimal) -> Self {
        Self {
            lower_bound: Money::from_major(lower),
            upper_bound: None,
            rate: Rate::from_decimal(rate),
        }
    }

    /// width of the band, `None` when open-ended
    pub fn width(&self) -> Option<Money> {
        self.upper_bound.map(|upper| upper - self.lower_bound)
    }

    /// label like "250000 - 500000" or "1000000 - ∞"
    pub fn label(&self) -> String {
        match self.upper_bound {
            Some(upper) => format!("{} - {}", self.lower_bound, upper),
            None => format!("{} - ∞", self.lower_bound),
        }
    }
}

/// tax credit for incomes at or below a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebateRule {
    pub threshold: Money,
    pub cap: Money,
}

/// deductions a regime allows; `None` means the regime does not offer it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DeductionRules {
    pub standard_deduction: Option<Money>,
    /// house rent allowance as a share of gross income
    pub hra_share: Option<Rate>,
    pub section_80c_cap: Option<Money>,
    pub nps_cap: Option<Money>,
    pub home_loan_interest_cap: Option<Money>,
    pub medical_insurance_cap: Option<Money>,
    /// employer NPS contribution as a share of gross income
    pub employer_nps_share: Option<Rate>,
}

/// everything needed to compute income tax under one regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRegimeConfig {
    pub regime: TaxRegime,
    pub slabs: Vec<TaxSlab>,
    pub rebate: Option<RebateRule>,
    pub deductions: DeductionRules,
}

impl TaxRegimeConfig {
    /// old regime with the full set of chapter VI-A deductions
    pub fn old_regime() -> Self {
        Self {
            regime: TaxRegime::Old,
            slabs: vec![
                TaxSlab::bounded(0, 250_000, dec!(0)),
                TaxSlab::bounded(250_000, 500_000, dec!(0.05)),
                TaxSlab::bounded(500_000, 1_000_000, dec!(0.20)),
                TaxSlab::unbounded(1_000_000, dec!(0.30)),
            ],
            rebate: Some(RebateRule {
                threshold: Money::from_major(500_000),
                cap: Money::from_major(12_500),
            }),
            deductions: DeductionRules {
                standard_deduction: Some(Money::from_major(50_000)),
                hra_share: Some(Rate::from_percentage(dec!(40))),
                section_80c_cap: Some(Money::from_major(150_000)),
                nps_cap: Some(Money::from_major(50_000)),
                home_loan_interest_cap: Some(Money::from_major(200_000)),
                medical_insurance_cap: Some(Money::from_major(25_000)),
                employer_nps_share: None,
            },
        }
    }

    /// new regime with flat standard deduction and employer NPS
    pub fn new_regime() -> Self {
        Self {
            regime: TaxRegime::New,
            slabs: vec![
                TaxSlab::bounded(0, 400_000, dec!(0)),
                TaxSlab::bounded(400_000, 800_000, dec!(0.05)),
                TaxSlab::bounded(800_000, 1_200_000, dec!(0.10)),
                TaxSlab::bounded(1_200_000, 1_600_000, dec!(0.15)),
                TaxSlab::bounded(1_600_000, 2_000_000, dec!(0.20)),
                TaxSlab::bounded(2_000_000, 2_400_000, dec!(0.25)),
                TaxSlab::unbounded(2_400_000, dec!(0.30)),
            ],
            rebate: Some(RebateRule {
                threshold: Money::from_major(1_200_000),
                cap: Money::from_major(60_000),
            }),
            deductions: DeductionRules {
                standard_deduction: Some(Money::from_major(75_000)),
                employer_nps_share: Some(Rate::from_percentage(dec!(14))),
                ..DeductionRules::default()
            },
        }
    }

    /// single-table estimator without rebate
    pub fn legacy() -> Self {
        Self {
            regime: TaxRegime::Legacy,
            slabs: vec![
                TaxSlab::bounded(0, 300_000, dec!(0)),
                TaxSlab::bounded(300_000, 600_000, dec!(0.05)),
                TaxSlab::bounded(600_000, 900_000, dec!(0.10)),
                TaxSlab::bounded(900_000, 1_200_000, dec!(0.15)),
                TaxSlab::bounded(1_200_000, 1_500_000, dec!(0.20)),
                TaxSlab::unbounded(1_500_000, dec!(0.30)),
            ],
            rebate: None,
            deductions: DeductionRules {
                standard_deduction: Some(Money::from_major(50_000)),
                ..DeductionRules::default()
            },
        }
    }

    pub fn for_regime(regime: TaxRegime) -> Self {
        match regime {
            TaxRegime::Old => Self::old_regime(),
            TaxRegime::New => Self::new_regime(),
            TaxRegime::Legacy => Self::legacy(),
        }
    }

    /// slabs must start at zero, be contiguous and ascending, and end open
    pub fn validate(&self) -> Result<()> {
        let first = self.slabs.first().ok_or_else(|| invalid("slab table is empty"))?;
        if !first.lower_bound.is_zero() {
            return Err(invalid("first slab must start at zero"));
        }

        let mut expected_lower = Money::ZERO;
        for (i, slab) in self.slabs.iter().enumerate() {
            if slab.lower_bound != expected_lower {
                return Err(invalid(&format!(
                    "slab {} starts at {} but previous slab ends at {}",
                    i, slab.lower_bound, expected_lower
                )));
            }
            if slab.rate.is_negative() || slab.rate > Rate::ONE {
                return Err(invalid(&format!("slab {} rate {} outside 0-100%", i, slab.rate)));
            }
            let is_last = i + 1 == self.slabs.len();
            match (slab.upper_bound, is_last) {
                (None, true) => {}
                (None, false) => {
                    return Err(invalid(&format!("slab {} is open-ended but not last", i)));
                }
                (Some(_), true) => return Err(invalid("last slab must be open-ended")),
                (Some(upper), false) => {
                    if upper <= slab.lower_bound {
                        return Err(invalid(&format!("slab {} has non-positive width", i)));
                    }
                    expected_lower = upper;
                }
            }
        }

        if let Some(rebate) = &self.rebate {
            if rebate.cap.is_negative() || rebate.threshold.is_negative() {
                return Err(invalid("rebate threshold and cap must be non-negative"));
            }
        }
        Ok(())
    }

    /// parse and validate a regime from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| invalid(&e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| invalid(&e.to_string()))
    }
}

/// inclusive age bounds in whole years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeLimits {
    pub min: u32,
    pub max: u32,
}

impl AgeLimits {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        let limits = Self { min, max };
        limits.validate()?;
        Ok(limits)
    }

    /// default limits for a job category
    pub fn for_category(category: JobCategory) -> Self {
        match category {
            JobCategory::General => Self { min: 18, max: 30 },
            JobCategory::Obc => Self { min: 18, max: 33 },
            JobCategory::Sc | JobCategory::St => Self { min: 18, max: 35 },
            JobCategory::Pwd => Self { min: 18, max: 40 },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(invalid(&format!(
                "minimum age {} exceeds maximum age {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// initial values the forms start with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorDefaults {
    pub gst_rate: Decimal,
    pub gst_rate_options: Vec<Decimal>,
    pub emi_rate: Decimal,
    pub emi_tenure_months: u32,
    pub ppf_rate: Decimal,
    pub ppf_tenure_years: u32,
    pub epf_employee_percent: Decimal,
    pub epf_employer_percent: Decimal,
    pub epf_rate: Decimal,
    pub epf_years: u32,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            gst_rate: dec!(18),
            gst_rate_options: vec![dec!(0), dec!(5), dec!(12), dec!(18), dec!(28)],
            emi_rate: dec!(8.5),
            emi_tenure_months: 12,
            ppf_rate: dec!(7.1),
            ppf_tenure_years: 15,
            epf_employee_percent: dec!(12),
            epf_employer_percent: dec!(12),
            epf_rate: dec!(8.1),
            epf_years: 15,
        }
    }
}

fn invalid(message: &str) -> CalcError {
    CalcError::InvalidConfiguration {
        message: message.to_string(),
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CalculatorDefaults;
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::input;
use crate::types::{GstMode, SupplyType};

/// base, tax and gross amount of one GST conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstBreakdown {
    pub base: Money,
    pub tax: Money,
    pub total: Money,
    pub rate: Rate,
}

impl GstBreakdown {
    /// divide the tax between the central/state or integrated components
    pub fn split(&self, supply: SupplyType) -> GstComponents {
        match supply {
            SupplyType::IntraState => {
                let cgst = (self.tax / Decimal::TWO).round_dp(2);
                GstComponents {
                    supply,
                    cgst,
                    sgst: self.tax - cgst,
                    igst: Money::ZERO,
                }
            }
            SupplyType::InterState => GstComponents {
                supply,
                cgst: Money::ZERO,
                sgst: Money::ZERO,
                igst: self.tax,
            },
        }
    }
}

/// CGST + SGST for intra-state supply, IGST otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstComponents {
    pub supply: SupplyType,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
}

impl GstComponents {
    pub fn total(&self) -> Money {
        self.cgst + self.sgst + self.igst
    }
}

/// split an amount into base and tax according to `mode`
pub fn split_gst(amount: Money, rate: Rate, mode: GstMode) -> Result<GstBreakdown> {
    if amount.is_negative() {
        return Err(CalcError::InvalidNumber {
            field: "amount".to_string(),
            value: amount.to_string(),
        });
    }
    if rate.is_negative() {
        return Err(CalcError::InvalidNumber {
            field: "GST rate".to_string(),
            value: rate.to_string(),
        });
    }

    let overflow = || CalcError::overflow("GST");
    let (base, tax, total) = match mode {
        GstMode::ActualToTotal { inclusive: false } => {
            let tax = amount.checked_mul(rate.as_decimal()).ok_or_else(overflow)?;
            (amount, tax, amount.checked_add(tax).ok_or_else(overflow)?)
        }
        GstMode::ActualToTotal { inclusive: true } | GstMode::TotalToActual => {
            let base = Decimal::ONE
                .checked_add(rate.as_decimal())
                .and_then(|divisor| amount.checked_div(divisor))
                .ok_or_else(overflow)?;
            (base, amount - base, amount)
        }
    };

    debug!(%amount, %rate, inclusive = mode.is_inclusive(), %base, %tax, "gst split");
    Ok(GstBreakdown { base, tax, total, rate })
}

/// which field the user typed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GstCalculationMode {
    #[default]
    ActualToTotal,
    TotalToActual,
}

/// raw GST form; also the persisted snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GstForm {
    pub amount: String,
    pub gst_rate: String,
    pub calculation_mode: GstCalculationMode,
    /// only honoured for actual-to-total
    pub is_inclusive: bool,
    pub result: Option<GstBreakdown>,
}

impl Default for GstForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            gst_rate: CalculatorDefaults::default().gst_rate.to_string(),
            calculation_mode: GstCalculationMode::ActualToTotal,
            is_inclusive: false,
            result: None,
        }
    }
}

impl GstForm {
    pub fn mode(&self) -> GstMode {
        match self.calculation_mode {
            GstCalculationMode::ActualToTotal => GstMode::ActualToTotal {
                inclusive: self.is_inclusive,
            },
            GstCalculationMode::TotalToActual => GstMode::TotalToActual,
        }
    }

    pub fn parse(&self) -> Result<(Money, Rate, GstMode)> {
        let amount = input::parse_money("amount", &self.amount)?;
        let rate = input::parse_rate("GST rate", &self.gst_rate)?;
        Ok((amount, rate, self.mode()))
    }

    /// recompute, clearing the result on error; reverse mode marks the form inclusive
    pub fn calculate(&mut self) -> Result<GstBreakdown> {
        let outcome = self
            .parse()
            .and_then(|(amount, rate, mode)| split_gst(amount, rate, mode));
        match &outcome {
            Ok(breakdown) => {
                if self.calculation_mode == GstCalculationMode::TotalToActual {
                    self.is_inclusive = true;
                }
                self.result = Some(*breakdown);
            }
            Err(_) => self.result = None,
        }
        outcome
    }
}

pub mod fixed;
pub mod provident;
pub mod recurring;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;

pub use fixed::{CompoundingFrequency, FixedDepositForm, FixedDepositPlan};
pub use provident::{
    EpfForm, EpfPlan, FundProjection, PpfForm, PpfPlan, YearlyBalance, YearwiseAccumulation,
};
pub use recurring::{RecurringDepositForm, RecurringDepositPlan};

/// what a deposit pays out at the end of its tenure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositMaturity {
    pub invested: Money,
    pub interest: Money,
    pub maturity: Money,
}

impl DepositMaturity {
    pub fn new(invested: Money, maturity: Money) -> Self {
        Self {
            invested,
            interest: maturity - invested,
            maturity,
        }
    }
}

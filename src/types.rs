use serde::{Deserialize, Serialize};
use std::fmt;

/// how loan interest accrues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InterestType {
    /// flat interest on the original principal for the whole term
    Simple,
    /// reducing-balance interest compounded monthly
    #[default]
    Compound,
}

/// which way a GST amount is being converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstMode {
    /// the amount entered is the actual (pre-tax) amount, unless `inclusive`
    /// says GST is already folded into it
    ActualToTotal { inclusive: bool },
    /// the amount entered is the tax-inclusive total
    TotalToActual,
}

impl GstMode {
    /// true when the entered amount already contains the tax
    pub fn is_inclusive(&self) -> bool {
        match self {
            GstMode::ActualToTotal { inclusive } => *inclusive,
            GstMode::TotalToActual => true,
        }
    }
}

/// place of supply for GST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyType {
    /// within a state, split into CGST and SGST
    IntraState,
    /// across states, charged as IGST
    InterState,
}

/// income tax regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    Old,
    New,
    /// single slab table with standard deduction only
    Legacy,
}

/// job category for age-limit relaxation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobCategory {
    #[default]
    General,
    Obc,
    Sc,
    St,
    Pwd,
}

impl JobCategory {
    pub const ALL: [JobCategory; 5] = [
        JobCategory::General,
        JobCategory::Obc,
        JobCategory::Sc,
        JobCategory::St,
        JobCategory::Pwd,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            JobCategory::General => "General category with standard age limits",
            JobCategory::Obc => "Other Backward Classes with relaxed upper age limit",
            JobCategory::Sc => "Scheduled Castes with relaxed upper age limit",
            JobCategory::St => "Scheduled Tribes with relaxed upper age limit",
            JobCategory::Pwd => "Persons with Disabilities with maximum age relaxation",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobCategory::General => "GENERAL",
            JobCategory::Obc => "OBC",
            JobCategory::Sc => "SC",
            JobCategory::St => "ST",
            JobCategory::Pwd => "PWD",
        };
        f.write_str(label)
    }
}

/// percentage relationship being asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PercentageMode {
    /// what is x% of y
    #[default]
    PercentOf,
    /// x is what percent of y
    IsWhatPercent,
    /// percentage change from x to y
    IncreaseDecrease,
}

impl PercentageMode {
    pub fn label(&self) -> &'static str {
        match self {
            PercentageMode::PercentOf => "What is X% of Y?",
            PercentageMode::IsWhatPercent => "X is what percent of Y?",
            PercentageMode::IncreaseDecrease => "What is the % increase/decrease from X to Y?",
        }
    }
}

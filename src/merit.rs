//! weighted merit score over a written (mains) stage and an interview

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::errors::{CalcError, Result};
use crate::input;

/// one stage: marks obtained out of a total, carrying a weight in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeritComponent {
    pub score: Decimal,
    pub total: Decimal,
    pub weight_percent: Decimal,
}

impl MeritComponent {
    pub fn new(score: Decimal, total: Decimal, weight_percent: Decimal) -> Self {
        Self {
            score,
            total,
            weight_percent,
        }
    }

    fn validate(&self, stage: &str) -> Result<()> {
        if self.score.is_sign_negative() && !self.score.is_zero() {
            return Err(CalcError::InvalidNumber {
                field: format!("{stage} score"),
                value: self.score.to_string(),
            });
        }
        if self.weight_percent < Decimal::ZERO || self.weight_percent > Decimal::ONE_HUNDRED {
            return Err(CalcError::InvalidNumber {
                field: format!("{stage} weight"),
                value: self.weight_percent.to_string(),
            });
        }
        if self.total <= Decimal::ZERO {
            return Err(CalcError::division_by_zero(&format!("{stage} total marks")));
        }
        Ok(())
    }

    /// score / total; `None` when the ratio leaves the decimal range
    pub fn fraction(&self) -> Option<Decimal> {
        self.score.checked_div(self.total)
    }

    /// fraction × weight
    pub fn contribution(&self) -> Option<Decimal> {
        self.fraction()?.checked_mul(self.weight_percent)
    }
}

/// audit trail of a merit calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeritScore {
    pub mains: MeritComponent,
    pub interview: MeritComponent,
    pub mains_fraction: Decimal,
    pub interview_fraction: Decimal,
    pub mains_contribution: Decimal,
    pub interview_contribution: Decimal,
    /// out of 100, rounded to two places
    pub score: Decimal,
}

impl fmt::Display for MeritScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Breakdown:")?;
        writeln!(
            f,
            "- Mains: {}/{} = {:.4} × {}% = {:.2}",
            self.mains.score.normalize(),
            self.mains.total.normalize(),
            self.mains_fraction,
            self.mains.weight_percent.normalize(),
            self.mains_contribution
        )?;
        writeln!(
            f,
            "- Interview: {}/{} = {:.4} × {}% = {:.2}",
            self.interview.score.normalize(),
            self.interview.total.normalize(),
            self.interview_fraction,
            self.interview.weight_percent.normalize(),
            self.interview_contribution
        )?;
        write!(f, "- Final Merit Score = {:.2} / 100", self.score)
    }
}

/// (mains/total)·weight + (interview/total)·weight; weights must total exactly 100
pub fn weighted_merit_score(mains: MeritComponent, interview: MeritComponent) -> Result<MeritScore> {
    mains.validate("mains")?;
    interview.validate("interview")?;

    let weight_sum = mains.weight_percent + interview.weight_percent;
    if weight_sum != Decimal::ONE_HUNDRED {
        return Err(CalcError::WeightSumError { sum: weight_sum.normalize() });
    }

    let overflow = || CalcError::overflow("merit score");
    let mains_fraction = mains.fraction().ok_or_else(overflow)?;
    let interview_fraction = interview.fraction().ok_or_else(overflow)?;
    let mains_contribution = mains.contribution().ok_or_else(overflow)?;
    let interview_contribution = interview.contribution().ok_or_else(overflow)?;
    let score = mains_contribution
        .checked_add(interview_contribution)
        .ok_or_else(overflow)?
        .round_dp(2);

    debug!(%score, "merit score computed");
    Ok(MeritScore {
        mains,
        interview,
        mains_fraction,
        interview_fraction,
        mains_contribution,
        interview_contribution,
        score,
    })
}

/// raw merit form; also the persisted snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeritForm {
    pub mains_score: String,
    pub mains_total: String,
    pub mains_weight: String,
    pub interview_score: String,
    pub interview_total: String,
    pub interview_weight: String,
}

impl Default for MeritForm {
    fn default() -> Self {
        Self {
            mains_score: String::new(),
            mains_total: "100".to_string(),
            mains_weight: String::new(),
            interview_score: String::new(),
            interview_total: "100".to_string(),
            interview_weight: String::new(),
        }
    }
}

impl MeritForm {
    pub fn parse(&self) -> Result<(MeritComponent, MeritComponent)> {
        let mains = MeritComponent::new(
            input::parse_non_negative("mains score", &self.mains_score)?,
            input::parse_non_negative("mains total marks", &self.mains_total)?,
            input::parse_non_negative("mains weight", &self.mains_weight)?,
        );
        let interview = MeritComponent::new(
            input::parse_non_negative("interview score", &self.interview_score)?,
            input::parse_non_negative("interview total marks", &self.interview_total)?,
            input::parse_non_negative("interview weight", &self.interview_weight)?,
        );
        Ok((mains, interview))
    }

    pub fn calculate(&self) -> Result<MeritScore> {
        let (mains, interview) = self.parse()?;
        weighted_merit_score(mains, interview)
    }
}

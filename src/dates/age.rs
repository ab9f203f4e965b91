use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AgeLimits;
use crate::dates::{date_diff, today, DateParts};
use crate::errors::{CalcError, Result};
use crate::input;
use crate::types::JobCategory;

/// how the age limit is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EligibilityCutoff {
    /// compare completed years only
    #[default]
    WholeYears,
    /// a single day past the maximum age disqualifies
    Strict,
}

/// the candidate's age, either from a birth date or typed in directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeInput {
    DateOfBirth(NaiveDate),
    Years(u32),
}

/// age window for one job category as of a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeEligibilityRule {
    pub category: JobCategory,
    pub limits: AgeLimits,
    pub reference_date: NaiveDate,
    pub cutoff: EligibilityCutoff,
}

/// outcome of an eligibility check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeEligibility {
    pub age: DateParts,
    pub is_eligible: bool,
    pub message: String,
    /// what the rule's category relaxes
    pub category_description: String,
}

impl AgeEligibilityRule {
    /// category defaults with the whole-years cutoff
    pub fn for_category(category: JobCategory, reference_date: NaiveDate) -> Self {
        Self {
            category,
            limits: AgeLimits::for_category(category),
            reference_date,
            cutoff: EligibilityCutoff::WholeYears,
        }
    }

    /// category defaults as of today's date
    pub fn for_category_today(category: JobCategory, time: &SafeTimeProvider) -> Self {
        Self::for_category(category, today(time))
    }

    /// replace the category defaults with custom limits
    pub fn with_limits(mut self, limits: AgeLimits) -> Result<Self> {
        limits.validate()?;
        self.limits = limits;
        Ok(self)
    }

    pub fn with_cutoff(mut self, cutoff: EligibilityCutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn evaluate(&self, input: AgeInput) -> Result<AgeEligibility> {
        let age = match input {
            AgeInput::DateOfBirth(dob) => self.age_on_reference_date(dob)?,
            AgeInput::Years(years) => DateParts::new(years, 0, 0),
        };
        let is_eligible = self.admits(&age);
        debug!(
            category = %self.category,
            min = self.limits.min,
            max = self.limits.max,
            %age,
            is_eligible,
            "age eligibility"
        );

        let message = if is_eligible {
            format!("You are eligible for {} category jobs", self.category)
        } else {
            format!(
                "You are not eligible for {} category jobs. Age limit: {}-{} years",
                self.category, self.limits.min, self.limits.max
            )
        };

        Ok(AgeEligibility {
            age,
            is_eligible,
            message,
            category_description: self.category.description().to_string(),
        })
    }

    /// age on the reference date; a birth date after it is rejected
    pub fn age_on_reference_date(&self, dob: NaiveDate) -> Result<DateParts> {
        if dob > self.reference_date {
            return Err(CalcError::InvalidRange {
                message: format!(
                    "date of birth {} cannot be after {}",
                    dob, self.reference_date
                ),
            });
        }
        date_diff(dob, self.reference_date)
    }

    fn admits(&self, age: &DateParts) -> bool {
        if age.years < self.limits.min {
            return false;
        }
        match self.cutoff {
            EligibilityCutoff::WholeYears => age.years <= self.limits.max,
            EligibilityCutoff::Strict => {
                age.years < self.limits.max
                    || (age.years == self.limits.max && age.is_whole_years())
            }
        }
    }
}

/// every category whose default limits admit `input` on `reference_date`
pub fn eligible_categories(input: AgeInput, reference_date: NaiveDate) -> Result<Vec<JobCategory>> {
    let mut eligible = Vec::new();
    for category in JobCategory::ALL {
        let rule = AgeEligibilityRule::for_category(category, reference_date);
        if rule.evaluate(input)?.is_eligible {
            eligible.push(category);
        }
    }
    Ok(eligible)
}

/// raw age-eligibility form, also its session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AgeEligibilityForm {
    pub date_of_birth: String,
    pub direct_age: String,
    /// true when the age is typed in rather than derived from a birth date
    pub use_direct_age: bool,
    pub category: JobCategory,
    pub custom_min: String,
    pub custom_max: String,
    pub strict: bool,
}

impl AgeEligibilityForm {
    /// build the rule for `reference_date` and the candidate's age input
    pub fn parse(&self, reference_date: NaiveDate) -> Result<(AgeEligibilityRule, AgeInput)> {
        let mut rule = AgeEligibilityRule::for_category(self.category, reference_date);
        if self.strict {
            rule = rule.with_cutoff(EligibilityCutoff::Strict);
        }

        // a blank bound keeps the category default
        let defaults = rule.limits;
        let min = parse_optional_age("minimum age", &self.custom_min)?.unwrap_or(defaults.min);
        let max = parse_optional_age("maximum age", &self.custom_max)?.unwrap_or(defaults.max);
        if (min, max) != (defaults.min, defaults.max) {
            rule = rule.with_limits(AgeLimits::new(min, max)?)?;
        }

        let age = if self.use_direct_age {
            AgeInput::Years(parse_age("age", &self.direct_age)?)
        } else {
            AgeInput::DateOfBirth(input::parse_date("date of birth", &self.date_of_birth)?)
        };
        Ok((rule, age))
    }

    pub fn evaluate(&self, time: &SafeTimeProvider) -> Result<AgeEligibility> {
        let (rule, age) = self.parse(today(time))?;
        rule.evaluate(age)
    }
}

fn parse_age(field: &str, raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CalcError::missing(field));
    }
    trimmed.parse::<u32>().map_err(|_| CalcError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn parse_optional_age(field: &str, raw: &str) -> Result<Option<u32>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_age(field, raw).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn general(reference: NaiveDate) -> AgeEligibilityRule {
        AgeEligibilityRule::for_category(JobCategory::General, reference)
    }

    #[test]
    fn test_within_limits() {
        let rule = general(date(2025, 1, 1));
        let result = rule.evaluate(AgeInput::DateOfBirth(date(2000, 6, 15))).unwrap();
        assert_eq!(result.age, DateParts::new(24, 6, 17));
        assert!(result.is_eligible);
        assert_eq!(result.message, "You are eligible for GENERAL category jobs");
    }

    #[test]
    fn test_under_minimum_by_a_day() {
        let rule = general(date(2025, 1, 1));
        let result = rule.evaluate(AgeInput::DateOfBirth(date(2007, 1, 2))).unwrap();
        assert_eq!(result.age.years, 17);
        assert!(!result.is_eligible);
        assert_eq!(
            result.message,
            "You are not eligible for GENERAL category jobs. Age limit: 18-30 years"
        );
    }

    #[test]
    fn test_whole_years_cutoff_tolerates_days_over_max() {
        let rule = general(date(2025, 1, 1));
        let result = rule.evaluate(AgeInput::DateOfBirth(date(1994, 6, 1))).unwrap();
        assert_eq!(result.age.years, 30);
        assert!(result.is_eligible);
    }

    #[test]
    fn test_strict_cutoff() {
        let rule = general(date(2025, 1, 1)).with_cutoff(EligibilityCutoff::Strict);

        // exactly 30 on the reference date
        let exact = rule.evaluate(AgeInput::DateOfBirth(date(1995, 1, 1))).unwrap();
        assert_eq!(exact.age, DateParts::new(30, 0, 0));
        assert!(exact.is_eligible);

        // one day past 30
        let over = rule.evaluate(AgeInput::DateOfBirth(date(1994, 12, 31))).unwrap();
        assert_eq!(over.age, DateParts::new(30, 0, 1));
        assert!(!over.is_eligible);

        let under = rule.evaluate(AgeInput::DateOfBirth(date(1995, 1, 2))).unwrap();
        assert!(under.is_eligible);
    }

    #[test]
    fn test_relaxed_categories() {
        let reference = date(2025, 1, 1);
        let obc = AgeEligibilityRule::for_category(JobCategory::Obc, reference);
        assert!(obc.evaluate(AgeInput::Years(33)).unwrap().is_eligible);
        assert!(!obc.evaluate(AgeInput::Years(34)).unwrap().is_eligible);

        let pwd = AgeEligibilityRule::for_category(JobCategory::Pwd, reference);
        assert!(pwd.evaluate(AgeInput::Years(40)).unwrap().is_eligible);
    }

    #[test]
    fn test_custom_limits() {
        let rule = general(date(2025, 1, 1))
            .with_limits(AgeLimits { min: 21, max: 27 })
            .unwrap();
        assert!(!rule.evaluate(AgeInput::Years(20)).unwrap().is_eligible);
        assert!(rule.evaluate(AgeInput::Years(27)).unwrap().is_eligible);
        assert!(general(date(2025, 1, 1))
            .with_limits(AgeLimits { min: 30, max: 20 })
            .is_err());
    }

    #[test]
    fn test_future_birth_date() {
        let rule = general(date(2025, 1, 1));
        assert!(matches!(
            rule.evaluate(AgeInput::DateOfBirth(date(2025, 1, 2))),
            Err(CalcError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_form_against_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
        ));
        let form = AgeEligibilityForm {
            date_of_birth: "1995-01-01".to_string(),
            category: JobCategory::General,
            strict: true,
            ..AgeEligibilityForm::default()
        };
        assert!(form.evaluate(&time).unwrap().is_eligible);

        let direct = AgeEligibilityForm {
            use_direct_age: true,
            direct_age: "36".to_string(),
            category: JobCategory::Sc,
            custom_max: "37".to_string(),
            ..AgeEligibilityForm::default()
        };
        let (rule, _) = direct.parse(date(2025, 1, 1)).unwrap();
        assert_eq!(rule.limits, AgeLimits { min: 18, max: 37 });
        assert!(direct.evaluate(&time).unwrap().is_eligible);

        let blank = AgeEligibilityForm::default();
        assert!(blank.evaluate(&time).unwrap_err().is_missing_input());
    }

    #[test]
    fn test_eligible_categories() {
        let reference = date(2025, 1, 1);
        assert_eq!(eligible_categories(AgeInput::Years(25), reference).unwrap(), JobCategory::ALL.to_vec());
        assert_eq!(
            eligible_categories(AgeInput::Years(34), reference).unwrap(),
            vec![JobCategory::Sc, JobCategory::St, JobCategory::Pwd]
        );
        assert!(eligible_categories(AgeInput::Years(41), reference).unwrap().is_empty());
        assert!(eligible_categories(AgeInput::DateOfBirth(date(2026, 1, 1)), reference).is_err());

        let result = AgeEligibilityRule::for_category(JobCategory::Pwd, reference)
            .evaluate(AgeInput::Years(39))
            .unwrap();
        assert_eq!(
            result.category_description,
            "Persons with Disabilities with maximum age relaxation"
        );
    }
}

pub mod age;

use chrono::{Datelike, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::errors::{CalcError, Result};
use crate::input;

pub use age::{eligible_categories, AgeEligibility, AgeEligibilityForm, AgeEligibilityRule, AgeInput, EligibilityCutoff};

/// calendar difference between two dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DateParts {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl DateParts {
    pub const ZERO: DateParts = DateParts { years: 0, months: 0, days: 0 };

    pub fn new(years: u32, months: u32, days: u32) -> Self {
        Self { years, months, days }
    }

    /// true when the difference lands exactly on a whole number of years
    pub fn is_whole_years(&self) -> bool {
        self.months == 0 && self.days == 0
    }
}

impl fmt::Display for DateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years, {} months, {} days", self.years, self.months, self.days)
    }
}

/// "X years, Y months, Z days" between `start` and `end`
///
/// fields are subtracted directly. a negative day count borrows the length
/// of the month before `end`'s month (stepping further back if one borrow is
/// not enough), then a negative month count borrows a year
pub fn date_diff(start: NaiveDate, end: NaiveDate) -> Result<DateParts> {
    if end < start {
        return Err(CalcError::InvalidRange {
            message: format!("end date {} cannot be before start date {}", end, start),
        });
    }

    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    let mut days = end.day() as i32 - start.day() as i32;

    let (mut borrow_year, mut borrow_month) = (end.year(), end.month());
    while days < 0 {
        (borrow_year, borrow_month) = previous_month(borrow_year, borrow_month);
        months -= 1;
        days += days_in_month(borrow_year, borrow_month) as i32;
    }
    while months < 0 {
        years -= 1;
        months += 12;
    }

    let parts = DateParts::new(years as u32, months as u32, days as u32);
    debug!(%start, %end, %parts, "date difference");
    Ok(parts)
}

/// today's date according to the injected clock
pub fn today(time: &SafeTimeProvider) -> NaiveDate {
    time.now().date_naive()
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// raw time-duration form, also its session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DurationForm {
    pub start_date: String,
    pub end_date: String,
    pub duration: DateParts,
    pub show_result: bool,
}

impl DurationForm {
    pub fn parse(&self) -> Result<(NaiveDate, NaiveDate)> {
        let start = input::parse_date("start date", &self.start_date)?;
        let end = input::parse_date("end date", &self.end_date)?;
        Ok((start, end))
    }

    /// recompute the duration, clearing the result on any error
    pub fn calculate(&mut self) -> Result<DateParts> {
        let outcome = self.parse().and_then(|(start, end)| date_diff(start, end));
        match &outcome {
            Ok(parts) => {
                self.duration = *parts;
                self.show_result = true;
            }
            Err(_) => {
                self.duration = DateParts::ZERO;
                self.show_result = false;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_is_zero() {
        let d = date(2024, 7, 19);
        assert_eq!(date_diff(d, d).unwrap(), DateParts::ZERO);
    }

    #[test]
    fn test_simple_difference() {
        assert_eq!(
            date_diff(date(2020, 1, 15), date(2023, 4, 20)).unwrap(),
            DateParts::new(3, 3, 5)
        );
    }

    #[test]
    fn test_leap_day_start() {
        // borrows January 2021 (31 days)
        assert_eq!(
            date_diff(date(2020, 2, 29), date(2021, 2, 28)).unwrap(),
            DateParts::new(0, 11, 30)
        );
        assert_eq!(
            date_diff(date(2020, 2, 29), date(2021, 3, 1)).unwrap(),
            DateParts::new(1, 0, 0)
        );
    }

    #[test]
    fn test_borrow_uses_previous_month_length() {
        // previous month of March 2024 is February with 29 days
        assert_eq!(
            date_diff(date(2024, 1, 30), date(2024, 3, 10)).unwrap(),
            DateParts::new(0, 1, 9)
        );
        // january borrow crosses the year boundary into december
        assert_eq!(
            date_diff(date(2023, 11, 25), date(2024, 1, 5)).unwrap(),
            DateParts::new(0, 1, 11)
        );
    }

    #[test]
    fn test_double_borrow_keeps_days_non_negative() {
        // february is too short to cover the 30-day deficit
        assert_eq!(
            date_diff(date(2023, 1, 31), date(2023, 3, 1)).unwrap(),
            DateParts::new(0, 0, 29)
        );
    }

    #[test]
    fn test_end_before_start() {
        assert!(matches!(
            date_diff(date(2024, 5, 2), date(2024, 5, 1)),
            Err(CalcError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(DateParts::new(2, 1, 0).to_string(), "2 years, 1 months, 0 days");
    }

    #[test]
    fn test_today_from_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap(),
        ));
        assert_eq!(today(&time), date(2025, 3, 14));
    }

    #[test]
    fn test_duration_form() {
        let mut form = DurationForm {
            start_date: "2020-01-01".to_string(),
            end_date: "2021-06-15".to_string(),
            ..DurationForm::default()
        };
        assert_eq!(form.calculate().unwrap(), DateParts::new(1, 5, 14));
        assert!(form.show_result);

        form.end_date = "2019-01-01".to_string();
        assert!(form.calculate().is_err());
        assert!(!form.show_result);
        assert_eq!(form.duration, DateParts::ZERO);

        form.end_date.clear();
        assert!(form.calculate().unwrap_err().is_missing_input());
    }
}

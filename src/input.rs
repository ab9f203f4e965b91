//! conversion of raw form strings into typed, validated values
//!
//! calculation functions never see strings; every form goes through these
//! helpers first

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};

/// trimmed value, or `MissingInput` when blank
fn required<'a>(field: &str, raw: &'a str) -> Result<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CalcError::missing(field));
    }
    Ok(trimmed)
}

fn invalid_number(field: &str, raw: &str) -> CalcError {
    CalcError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

/// parse any decimal number, accepting scientific notation
pub fn parse_decimal(field: &str, raw: &str) -> Result<Decimal> {
    let value = required(field, raw)?;
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid_number(field, raw))
}

/// non-negative decimal
pub fn parse_non_negative(field: &str, raw: &str) -> Result<Decimal> {
    let value = parse_decimal(field, raw)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid_number(field, raw));
    }
    Ok(value)
}

/// strictly positive decimal
pub fn parse_positive(field: &str, raw: &str) -> Result<Decimal> {
    let value = parse_decimal(field, raw)?;
    if value <= Decimal::ZERO {
        return Err(CalcError::non_positive(field));
    }
    Ok(value)
}

/// non-negative money amount
pub fn parse_money(field: &str, raw: &str) -> Result<Money> {
    parse_non_negative(field, raw).map(Money::from_decimal)
}

/// strictly positive money amount
pub fn parse_positive_money(field: &str, raw: &str) -> Result<Money> {
    parse_positive(field, raw).map(Money::from_decimal)
}

/// money amount where a blank field means zero
pub fn parse_optional_money(field: &str, raw: &str) -> Result<Money> {
    if raw.trim().is_empty() {
        return Ok(Money::ZERO);
    }
    parse_money(field, raw)
}

/// rate entered as a percentage ("7.1" -> 7.1%)
pub fn parse_rate(field: &str, raw: &str) -> Result<Rate> {
    parse_non_negative(field, raw).map(Rate::from_percentage)
}

/// whole, strictly positive count (months, years, installments)
pub fn parse_count(field: &str, raw: &str) -> Result<u32> {
    let value = required(field, raw)?;
    let count = u32::from_str(value).map_err(|_| invalid_number(field, raw))?;
    if count == 0 {
        return Err(CalcError::non_positive(field));
    }
    Ok(count)
}

/// calendar date in ISO form (YYYY-MM-DD)
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let value = required(field, raw)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CalcError::InvalidDate {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("missing input: {field} is required")]
    MissingInput {
        field: String,
    },

    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber {
        field: String,
        value: String,
    },

    #[error("invalid date for {field}: {value:?}")]
    InvalidDate {
        field: String,
        value: String,
    },

    #[error("invalid range: {message}")]
    InvalidRange {
        message: String,
    },

    #[error("{field} must be greater than zero")]
    NonPositiveValue {
        field: String,
    },

    #[error("weights must total 100%, got {sum}%")]
    WeightSumError {
        sum: Decimal,
    },

    #[error("cannot divide by zero in {operation}")]
    DivisionByZero {
        operation: String,
    },

    #[error("result too large to compute in {operation}")]
    Overflow {
        operation: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("session snapshot error: {message}")]
    Snapshot {
        message: String,
    },
}

impl CalcError {
    pub(crate) fn missing(field: &str) -> Self {
        CalcError::MissingInput {
            field: field.to_string(),
        }
    }

    pub(crate) fn non_positive(field: &str) -> Self {
        CalcError::NonPositiveValue {
            field: field.to_string(),
        }
    }

    pub(crate) fn division_by_zero(operation: &str) -> Self {
        CalcError::DivisionByZero {
            operation: operation.to_string(),
        }
    }

    pub(crate) fn overflow(operation: &str) -> Self {
        CalcError::Overflow {
            operation: operation.to_string(),
        }
    }

    /// true when the error blocks calculation only because a field is still blank
    pub fn is_missing_input(&self) -> bool {
        matches!(self, CalcError::MissingInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            CalcError::missing("principal").to_string(),
            "missing input: principal is required"
        );
        assert_eq!(
            CalcError::WeightSumError { sum: dec!(90) }.to_string(),
            "weights must total 100%, got 90%"
        );
        assert_eq!(
            CalcError::division_by_zero("percentage change").to_string(),
            "cannot divide by zero in percentage change"
        );
        assert_eq!(
            CalcError::overflow("fixed deposit maturity").to_string(),
            "result too large to compute in fixed deposit maturity"
        );
    }

    #[test]
    fn test_missing_input_classification() {
        assert!(CalcError::missing("rate").is_missing_input());
        assert!(!CalcError::non_positive("rate").is_missing_input());
    }
}

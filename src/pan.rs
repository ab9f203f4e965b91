//! PAN format check: five letters, four digits, one letter, all uppercase

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, Result};

pub const PAN_LENGTH: usize = 10;

/// true when `value` is exactly in the `ABCDE1234F` shape
///
/// no case folding happens here; [`PanForm`] uppercases its input first
pub fn is_valid_pan(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == PAN_LENGTH
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanCheck {
    pub pan: String,
    pub is_valid: bool,
    pub message: String,
}

/// raw PAN field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PanForm {
    pub pan_number: String,
}

impl PanForm {
    /// the typed value, uppercased
    pub fn normalized(&self) -> String {
        self.pan_number.trim().to_ascii_uppercase()
    }

    pub fn validate(&self) -> Result<PanCheck> {
        let pan = self.normalized();
        if pan.is_empty() {
            return Err(CalcError::missing("PAN number"));
        }

        let is_valid = is_valid_pan(&pan);
        let message = if is_valid {
            "Valid PAN number format".to_string()
        } else {
            "Invalid PAN number format. Should be in format: ABCDE1234F".to_string()
        };
        debug!(is_valid, "pan format checked");
        Ok(PanCheck { pan, is_valid, message })
    }
}

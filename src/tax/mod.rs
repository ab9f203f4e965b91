pub mod gst;
pub mod income;

pub use gst::{split_gst, GstBreakdown, GstCalculationMode, GstComponents, GstForm};
pub use income::{
    bracket_tax, compute_income_tax, rebate_for, BracketTax, DeductionClaims, IncomeTaxForm, IncomeTaxReport,
    SlabTax,
};

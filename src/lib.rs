pub mod config;
pub mod dates;
pub mod decimal;
pub mod deposits;
pub mod errors;
pub mod input;
pub mod loans;
pub mod merit;
pub mod pan;
pub mod percentage;
pub mod session;
pub mod tax;
pub mod types;

// re-export key types
pub use config::{AgeLimits, CalculatorDefaults, DeductionRules, RebateRule, TaxRegimeConfig, TaxSlab};
pub use dates::{
    date_diff, eligible_categories, AgeEligibility, AgeEligibilityRule, AgeInput, DateParts, EligibilityCutoff,
};
pub use decimal::{Money, Rate};
pub use deposits::{
    CompoundingFrequency, DepositMaturity, EpfPlan, FixedDepositPlan, FundProjection, PpfPlan,
    RecurringDepositPlan, YearlyBalance, YearwiseAccumulation,
};
pub use errors::{CalcError, Result};
pub use loans::{
    calculate_eligibility, calculate_emi, compare_offers, max_principal_for_emi, AmortizationSchedule,
    EligibilityRequest, LoanComparison, LoanOffer, LoanTerms,
};
pub use merit::{weighted_merit_score, MeritComponent, MeritScore};
pub use pan::is_valid_pan;
pub use percentage::{calculate_percentage, PercentageResult};
pub use session::{load_snapshot, save_snapshot, MemorySessionStore, SessionStore};
pub use tax::{compute_income_tax, split_gst, DeductionClaims, GstBreakdown, IncomeTaxReport};
pub use types::{GstMode, InterestType, JobCategory, PercentageMode, SupplyType, TaxRegime};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;

pub mod amortization;
pub mod comparison;
pub mod eligibility;
pub mod emi;

pub use amortization::{AmortizationSchedule, ScheduledPayment};
pub use comparison::{compare_offers, parse_offers, LoanComparison, LoanOffer, LoanOfferForm, OfferResult};
pub use eligibility::{
    calculate_eligibility, EligibilityRequest, LoanEligibility, LoanEligibilityForm, DEBT_SERVICE_RATIO,
};
pub use emi::{
    calculate_emi, max_principal_for_emi, simple_interest_emi, EmiSummary, LoanEmiForm, LoanTerms,
};

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::loans::emi::LoanTerms;
use crate::types::InterestType;

/// one installment in an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    pub payment_date: Option<NaiveDate>,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// month-by-month repayment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub terms: LoanTerms,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// generate payment schedule; installment `i` falls `i` months after
    /// `start_date` when one is given
    pub fn generate(terms: &LoanTerms, start_date: Option<NaiveDate>) -> Result<Self> {
        terms.validate()?;

        let payments = match terms.interest_type {
            InterestType::Compound => reducing_balance(terms, start_date)?,
            InterestType::Simple => flat_rate(terms, start_date)?,
        };

        let total_interest = payments.iter().map(|p| p.interest_portion).sum();
        let total_payment = payments.iter().map(|p| p.payment_amount).sum();

        Ok(Self {
            terms: *terms,
            payments,
            total_interest,
            total_payment,
        })
    }

    /// get payment for specific period
    pub fn get_payment(&self, payment_number: u32) -> Option<&ScheduledPayment> {
        payment_number
            .checked_sub(1)
            .and_then(|i| self.payments.get(i as usize))
    }

    /// get remaining balance after payment
    pub fn balance_after_payment(&self, payment_number: u32) -> Money {
        self.get_payment(payment_number)
            .map(|p| p.ending_balance)
            .unwrap_or(self.terms.principal)
    }
}

fn reducing_balance(terms: &LoanTerms, start_date: Option<NaiveDate>) -> Result<Vec<ScheduledPayment>> {
    let monthly_rate = terms.annual_rate.monthly_rate();
    let emi = terms.emi()?;

    let mut payments = Vec::with_capacity(terms.tenure_months as usize);
    let mut balance = terms.principal;
    let mut cumulative_interest = Money::ZERO;
    let mut cumulative_principal = Money::ZERO;

    for i in 1..=terms.tenure_months {
        let interest_portion = balance.apply_rate(monthly_rate);
        let principal_portion = (emi - interest_portion).min(balance);

        cumulative_interest += interest_portion;
        cumulative_principal += principal_portion;

        let ending_balance = (balance - principal_portion).floor_zero();

        payments.push(ScheduledPayment {
            payment_number: i,
            payment_date: payment_date(start_date, i),
            beginning_balance: balance,
            payment_amount: interest_portion + principal_portion,
            principal_portion,
            interest_portion,
            ending_balance,
            cumulative_interest,
            cumulative_principal,
        });

        balance = ending_balance;
    }

    // adjust last payment for rounding
    if let Some(last) = payments.last_mut() {
        if last.ending_balance.is_positive() && last.ending_balance < Money::ONE {
            last.principal_portion += last.ending_balance;
            last.payment_amount += last.ending_balance;
            last.cumulative_principal += last.ending_balance;
            last.ending_balance = Money::ZERO;
        }
    }

    Ok(payments)
}

/// flat-rate loans charge the same interest every month
fn flat_rate(terms: &LoanTerms, start_date: Option<NaiveDate>) -> Result<Vec<ScheduledPayment>> {
    let months = Decimal::from(terms.tenure_months);
    let emi = terms.emi()?;
    let principal_portion = terms.principal / months;
    let interest_portion = emi - principal_portion;

    let mut payments = Vec::with_capacity(terms.tenure_months as usize);
    let mut balance = terms.principal;
    let mut cumulative_interest = Money::ZERO;
    let mut cumulative_principal = Money::ZERO;

    for i in 1..=terms.tenure_months {
        let is_last = i == terms.tenure_months;
        // last installment clears whatever rounding left behind
        let principal_portion = if is_last { balance } else { principal_portion.min(balance) };

        cumulative_interest += interest_portion;
        cumulative_principal += principal_portion;
        let ending_balance = (balance - principal_portion).floor_zero();

        payments.push(ScheduledPayment {
            payment_number: i,
            payment_date: payment_date(start_date, i),
            beginning_balance: balance,
            payment_amount: principal_portion + interest_portion,
            principal_portion,
            interest_portion,
            ending_balance,
            cumulative_interest,
            cumulative_principal,
        });

        balance = ending_balance;
    }

    Ok(payments)
}

fn payment_date(start_date: Option<NaiveDate>, months_after: u32) -> Option<NaiveDate> {
    start_date.and_then(|d| d.checked_add_months(Months::new(months_after)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reducing_balance_schedule() {
        let terms = LoanTerms::new(Money::from_major(100_000), Rate::from_percentage(dec!(12)), 12);
        let schedule = AmortizationSchedule::generate(&terms, None).unwrap();

        assert_eq!(schedule.payments.len(), 12);

        let first = schedule.get_payment(1).unwrap();
        assert_eq!(first.interest_portion, Money::from_major(1_000));
        assert_eq!(first.beginning_balance, Money::from_major(100_000));

        let last = schedule.get_payment(12).unwrap();
        assert_eq!(last.ending_balance, Money::ZERO);
        assert_eq!(last.cumulative_principal, Money::from_major(100_000));

        // interest share shrinks every month
        for pair in schedule.payments.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }

        assert_eq!(schedule.total_interest.round_dp(0), Money::from_major(6_619));
        assert_eq!(
            schedule.total_payment,
            schedule.total_interest + terms.principal
        );
    }

    #[test]
    fn test_zero_rate_schedule() {
        let terms = LoanTerms::new(Money::from_major(1_200), Rate::ZERO, 12);
        let schedule = AmortizationSchedule::generate(&terms, None).unwrap();
        assert!(schedule.payments.iter().all(|p| p.payment_amount == Money::from_major(100)));
        assert_eq!(schedule.total_interest, Money::ZERO);
    }

    #[test]
    fn test_flat_rate_schedule() {
        let terms = LoanTerms::from_years(Money::from_major(100_000), Rate::from_percentage(dec!(10)), 2)
            .with_interest_type(InterestType::Simple);
        let schedule = AmortizationSchedule::generate(&terms, None).unwrap();

        assert_eq!(schedule.payments.len(), 24);
        assert!(schedule
            .payments
            .iter()
            .all(|p| p.interest_portion == schedule.payments[0].interest_portion));
        assert_eq!(schedule.total_interest.round_dp(2), Money::from_major(20_000));
        assert_eq!(schedule.balance_after_payment(24), Money::ZERO);
    }

    #[test]
    fn test_payment_dates() {
        let terms = LoanTerms::new(Money::from_major(10_000), Rate::from_percentage(dec!(9)), 3);
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let schedule = AmortizationSchedule::generate(&terms, Some(start)).unwrap();
        assert_eq!(
            schedule.get_payment(1).unwrap().payment_date,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            schedule.get_payment(3).unwrap().payment_date,
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
    }

    #[test]
    fn test_out_of_range_lookups() {
        let terms = LoanTerms::new(Money::from_major(10_000), Rate::from_percentage(dec!(9)), 3);
        let schedule = AmortizationSchedule::generate(&terms, None).unwrap();
        assert!(schedule.get_payment(0).is_none());
        assert!(schedule.get_payment(4).is_none());
        assert_eq!(schedule.balance_after_payment(0), terms.principal);
    }

    #[test]
    fn test_oversized_tenure_rejected_before_allocating() {
        let terms = LoanTerms::new(Money::from_major(10_000), Rate::from_percentage(dec!(9)), u32::MAX);
        assert!(matches!(
            AmortizationSchedule::generate(&terms, None),
            Err(crate::errors::CalcError::InvalidNumber { .. })
        ));
        let flat = terms.with_interest_type(InterestType::Simple);
        assert!(AmortizationSchedule::generate(&flat, None).is_err());
    }
}

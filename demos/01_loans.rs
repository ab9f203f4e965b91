/// loans - schedule, eligibility and offer comparison
use fincalc_rs::loans::max_principal_for_emi;
use fincalc_rs::{
    calculate_eligibility, compare_offers, AmortizationSchedule, EligibilityRequest, InterestType, LoanOffer,
    LoanTerms, Money, Rate,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let terms = LoanTerms::new(Money::from_major(100_000), Rate::from_percentage(dec!(12)), 12);
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).ok_or("bad date")?;
    let schedule = AmortizationSchedule::generate(&terms, Some(start))?;

    println!("{:>3}  {:>12}  {:>10}  {:>10}  {:>12}", "#", "opening", "interest", "principal", "closing");
    for row in &schedule.payments {
        println!(
            "{:>3}  {:>12}  {:>10}  {:>10}  {:>12}",
            row.payment_number,
            row.beginning_balance.round_dp(2),
            row.interest_portion.round_dp(2),
            row.principal_portion.round_dp(2),
            row.ending_balance.round_dp(2),
        );
    }
    println!("total interest: {}", schedule.total_interest.round_dp(2));

    // how much can a 1 lakh monthly income borrow
    let eligibility = calculate_eligibility(&EligibilityRequest {
        monthly_income: Money::from_major(100_000),
        existing_emis: Money::from_major(10_000),
        tenure_years: 20,
        annual_rate: Rate::from_percentage(dec!(8.5)),
    })?;
    println!(
        "eligible EMI: {} eligible loan: {}",
        eligibility.eligible_emi.round_dp(2),
        eligibility.eligible_loan.round_dp(0)
    );
    let check = max_principal_for_emi(eligibility.eligible_emi, Rate::from_percentage(dec!(8.5)), 240)?;
    println!("same figure solved directly: {}", check.round_dp(0));

    let offers = [
        LoanOffer::new(Money::from_major(500_000), Rate::from_percentage(dec!(9)), 5),
        LoanOffer::new(Money::from_major(500_000), Rate::from_percentage(dec!(8.5)), 5),
        LoanOffer::new(Money::from_major(500_000), Rate::from_percentage(dec!(8.5)), 7),
        LoanOffer::new(Money::from_major(500_000), Rate::from_percentage(dec!(7)), 5)
            .with_interest_type(InterestType::Simple),
    ];
    let comparison = compare_offers(&offers)?;
    for result in comparison.ranked_by_total_cost() {
        println!(
            "offer {} at {}: EMI {} total {}{}{}",
            result.index + 1,
            result.offer.annual_rate,
            result.summary.emi.round_dp(2),
            result.summary.total_payment.round_dp(2),
            if result.lowest_emi { " [lowest EMI]" } else { "" },
            if result.lowest_total_payment { " [lowest cost]" } else { "" },
        );
    }

    Ok(())
}

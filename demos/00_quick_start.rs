/// quick start - one calculation from each family
use fincalc_rs::deposits::CompoundingFrequency;
use fincalc_rs::{
    calculate_percentage, date_diff, eligible_categories, is_valid_pan, split_gst, AgeInput, FixedDepositPlan,
    GstMode, LoanTerms, Money, PercentageMode, Rate,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // a 10 lakh home loan over 20 years
    let loan = LoanTerms::new(Money::from_major(1_000_000), Rate::from_percentage(dec!(8.5)), 240);
    let summary = loan.summary()?;
    println!("EMI: {}", summary.emi.round_dp(2));
    println!("total interest: {}", summary.total_interest.round_dp(2));

    // fixed deposit
    let fd = FixedDepositPlan {
        principal: Money::from_major(100_000),
        annual_rate: Rate::from_percentage(dec!(7)),
        tenure_years: dec!(5),
        frequency: CompoundingFrequency::Yearly,
    };
    println!("FD maturity: {}", fd.maturity()?.maturity.round_dp(2));

    // GST on top of an invoice
    let gst = split_gst(
        Money::from_major(1_000),
        Rate::from_percentage(dec!(18)),
        GstMode::ActualToTotal { inclusive: false },
    )?;
    println!("GST: {} total: {}", gst.tax, gst.total);

    let parts = date_diff(
        chrono::NaiveDate::from_ymd_opt(2020, 1, 15).ok_or("bad date")?,
        chrono::NaiveDate::from_ymd_opt(2023, 4, 20).ok_or("bad date")?,
    )?;
    println!("duration: {parts}");

    let change = calculate_percentage(PercentageMode::IncreaseDecrease, dec!(50), dec!(75))?;
    println!("{}", change.export_text());

    let reference = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad date")?;
    for category in eligible_categories(AgeInput::Years(34), reference)? {
        println!("age 34 qualifies for {category}: {}", category.description());
    }

    println!("ABCDE1234F valid: {}", is_valid_pan("ABCDE1234F"));

    Ok(())
}

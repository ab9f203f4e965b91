/// income tax - the same salary under every regime
use fincalc_rs::{compute_income_tax, DeductionClaims, Money, TaxRegime, TaxRegimeConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let gross = Money::from_major(1_500_000);
    let claims = DeductionClaims {
        section_80c: true,
        nps: true,
        employer_nps: true,
        ..DeductionClaims::default()
    };

    for regime in [TaxRegime::Old, TaxRegime::New, TaxRegime::Legacy] {
        let report = compute_income_tax(gross, &TaxRegimeConfig::for_regime(regime), &claims)?;
        println!("{:?} regime", regime);
        println!("  deductions: {}", report.total_deductions.round_dp(2));
        println!("  taxable:    {}", report.taxable_income.round_dp(2));
        for row in &report.breakdown {
            println!("  {:<22} {:>6} {:>12}", row.label, row.rate.to_string(), row.tax.round_dp(2));
        }
        println!("  rebate:     {}", report.rebate.round_dp(2));
        println!("  tax:        {} ({:.2}%)", report.total_tax.round_dp(2), report.effective_rate);
    }

    // slab tables can be shipped as JSON
    let json = TaxRegimeConfig::new_regime().to_json()?;
    let reloaded = TaxRegimeConfig::from_json(&json)?;
    println!("reloaded {} slabs", reloaded.slabs.len());

    Ok(())
}

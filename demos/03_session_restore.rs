/// session restore - forms survive a round trip through the store
use chrono::{TimeZone, Utc};
use fincalc_rs::dates::{AgeEligibilityForm, DurationForm};
use fincalc_rs::percentage::PercentageForm;
use fincalc_rs::session::{clear_snapshot, AGE_ELIGIBILITY_KEY, PERCENTAGE_KEY, TIME_DURATION_KEY};
use fincalc_rs::{
    load_snapshot, save_snapshot, JobCategory, MemorySessionStore, PercentageMode, SafeTimeProvider, SessionStore,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().ok_or("bad time")?;
    let time = SafeTimeProvider::new(TimeSource::Test(now));
    let mut store = MemorySessionStore::new();

    let mut duration = DurationForm {
        start_date: "2019-03-10".to_string(),
        end_date: "2025-06-01".to_string(),
        ..DurationForm::default()
    };
    duration.calculate()?;
    save_snapshot(&mut store, TIME_DURATION_KEY, &duration)?;

    let mut percentage = PercentageForm {
        mode: PercentageMode::IsWhatPercent,
        input1: "45".to_string(),
        input2: "60".to_string(),
        ..PercentageForm::default()
    };
    percentage.calculate()?;
    save_snapshot(&mut store, PERCENTAGE_KEY, &percentage)?;

    let age = AgeEligibilityForm {
        date_of_birth: "1996-08-20".to_string(),
        category: JobCategory::Obc,
        ..AgeEligibilityForm::default()
    };
    save_snapshot(&mut store, AGE_ELIGIBILITY_KEY, &age)?;

    // later, on the next visit
    let restored: DurationForm = load_snapshot(&store, TIME_DURATION_KEY).unwrap_or_default();
    println!("duration: {}", restored.duration);

    let restored: PercentageForm = load_snapshot(&store, PERCENTAGE_KEY).unwrap_or_default();
    println!("percentage: {}", restored.summary);

    let restored: AgeEligibilityForm = load_snapshot(&store, AGE_ELIGIBILITY_KEY).unwrap_or_default();
    println!("age check: {}", restored.evaluate(&time)?.message);

    // a corrupt entry falls back to defaults with a warning
    store.set(PERCENTAGE_KEY, "{not json".to_string());
    let fallback: PercentageForm = load_snapshot(&store, PERCENTAGE_KEY).unwrap_or_default();
    println!("after corruption, show result: {}", fallback.show_result);

    clear_snapshot(&mut store, TIME_DURATION_KEY);
    println!("entries left: {}", store.len());

    Ok(())
}

use biostudy::stats::{CI_HIGH, CI_LOW};
use biostudy::{Biomarker, Participant, PathExpr, Result, Study, StudyStats};
use chrono::{NaiveDate, NaiveDateTime};
use log::info;

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid demo date")
        .and_hms_opt(0, 0, 0)
        .expect("valid demo time")
}

fn participant(name: &str, arm: &str, hba1c: f64, weight: f64) -> Result<Participant> {
    let targeted = date(2024, 1, 1);
    let mut participant = Participant::new(name);

    participant
        .add_measurement(Biomarker::new(
            name,
            "HbA1c",
            hba1c,
            Some(date(2024, 1, 10)),
            None,
            Some(arm.to_string()),
            Some(targeted),
            None,
        )?)?
        .add_measurement(Biomarker::new(
            name,
            "weight",
            weight,
            Some(date(2024, 1, 10)),
            None,
            Some(arm.to_string()),
            Some(targeted),
            None,
        )?)?;

    Ok(participant)
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut study = Study::new("demo-cohort");
    study.add_participants(vec![
        participant("P1", "treatment", 7.2, 70.0)?,
        participant("P2", "control", 6.8, 80.0)?,
        participant("P3", "treatment", 7.9, 92.5)?,
    ]);
    info!(
        "Built study '{}' with {} participants",
        study.name,
        study.len()
    );

    // All weight values across the cohort
    let weights = PathExpr::new().any().any().key("weight").any().select("value");
    let stats = StudyStats::new(&study);
    if let Some(mean) = stats.mean(&weights)? {
        info!("Mean weight: {mean:.1}");
    }
    if let Some(median) = stats.median(&weights)? {
        info!("Median weight: {median:.1}");
    }
    if let Some((low, high)) = stats.confidence_interval(&weights, CI_LOW, CI_HIGH)? {
        info!("Weight {CI_LOW}-{CI_HIGH} percentile interval: [{low:.1}, {high:.1}]");
    }

    let table = study.as_record_batch()?;
    info!(
        "Exported cohort table: {} rows x {} columns",
        table.num_rows(),
        table.num_columns()
    );

    Ok(())
}

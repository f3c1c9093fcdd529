use chrono::{NaiveDate, Utc};
use clap::Args;
use rezzonix::analysis::{
    AnalysisComputation, AnalysisSubmission, IntakeGuard, Organ, ScanInput, ScoringEngine,
};
use rezzonix::config::AppConfig;
use rezzonix::error::AppError;
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct ScanArgs {
    /// Patient name used in the scan seed
    #[arg(long)]
    pub(crate) name: String,
    /// Patient age in years
    #[arg(long)]
    pub(crate) age: Option<i64>,
    /// Organ to include; repeat for several (English or Turkish labels)
    #[arg(long = "organ", required = true)]
    pub(crate) organs: Vec<String>,
    /// Sensing device type (BLE or USB)
    #[arg(long, default_value = "BLE")]
    pub(crate) sensor: String,
    /// Reference date for the scan (YYYY-MM-DD, defaults to today in UTC)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Print the assessment as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    patient_name: &'a str,
    patient_age: Option<u32>,
    reference_date: NaiveDate,
    frequency: u32,
    #[serde(flatten)]
    computation: &'a AnalysisComputation,
}

/// Score a scan offline; nothing is persisted.
pub(crate) fn run_scan(args: ScanArgs) -> Result<(), AppError> {
    let ScanArgs {
        name,
        age,
        organs,
        sensor,
        date,
        json,
    } = args;

    let config = AppConfig::load()?;
    let guard = IntakeGuard::from_settings(&config.analysis);
    let request = guard.request_from_submission(AnalysisSubmission {
        patient_name: name,
        patient_age: age,
        selected_organs: organs,
        sensor_type: sensor,
        sensor_name: None,
        frequency: None,
    })?;

    let reference_date = date.unwrap_or_else(|| Utc::now().date_naive());
    let computation = ScoringEngine::new().compute(&ScanInput {
        patient_name: &request.patient_name,
        patient_age: request.patient_age,
        organs: &request.organs,
        sensor_kind: request.sensor_kind,
        reference_date,
    });

    let report = ScanReport {
        patient_name: &request.patient_name,
        patient_age: request.patient_age,
        reference_date,
        frequency: request.frequency,
        computation: &computation,
    };

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        println!("{rendered}");
    } else {
        render_scan_report(&report, request.sensor_kind.label());
    }

    Ok(())
}

fn render_scan_report(report: &ScanReport<'_>, sensor: &str) {
    let age = report
        .patient_age
        .map(|age| age.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    println!("RezzoniX balance scan");
    println!(
        "Patient: {} (age {}) | sensor {} | {} Hz | {}",
        report.patient_name, age, sensor, report.frequency, report.reference_date
    );
    println!(
        "Overall score: {} ({})",
        report.computation.overall_score, report.computation.band
    );
    println!("\nOrgan results (highest stress first)");
    for result in &report.computation.results {
        println!(
            "- {:<12} score {:>3} | stress {:>2} | {}",
            result.organ.label(),
            result.score,
            result.stress,
            result.note.text()
        );
    }
}

pub(crate) fn run_organ_catalog() -> Result<(), AppError> {
    println!("Selectable organs");
    for organ in Organ::ALL {
        println!("- {:<12} ({})", organ.label(), organ.turkish_label());
    }
    Ok(())
}

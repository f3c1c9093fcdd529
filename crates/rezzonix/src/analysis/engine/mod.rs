mod policy;
mod rules;
mod seed;

pub use policy::{classify_band, overall_score, BALANCED_THRESHOLD, MONITOR_THRESHOLD};
pub use rules::{stress_for_score, SCORE_CEILING, SCORE_FLOOR};
pub use seed::seed_phrase;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{Organ, SensorKind};
use super::domain::{BalanceBand, OrganResult};

/// Inputs for one scan. Only the patient snapshot, organ list and reference date feed the seed.
#[derive(Debug, Clone, Copy)]
pub struct ScanInput<'a> {
    pub patient_name: &'a str,
    pub patient_age: Option<u32>,
    pub organs: &'a [Organ],
    pub sensor_kind: SensorKind,
    pub reference_date: NaiveDate,
}

/// Engine output before it is wrapped into a persisted `Analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisComputation {
    pub overall_score: u8,
    pub band: BalanceBand,
    pub results: Vec<OrganResult>,
}

/// Stateless, deterministic scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, input: &ScanInput<'_>) -> AnalysisComputation {
        let phrase = seed_phrase(
            input.patient_name,
            input.patient_age,
            input.organs,
            input.reference_date,
        );
        let mut rng = seed::seeded_rng(&phrase);

        // One draw per organ, in submission order.
        let mut results: Vec<OrganResult> = input
            .organs
            .iter()
            .map(|organ| rules::derive_result(*organ, &mut rng))
            .collect();

        let overall_score = overall_score(&results);
        let band = classify_band(overall_score);
        policy::order_by_stress(&mut results);

        AnalysisComputation {
            overall_score,
            band,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_organ_list_yields_zero_score_without_panicking() {
        let engine = ScoringEngine::new();
        let computation = engine.compute(&ScanInput {
            patient_name: "Nobody",
            patient_age: None,
            organs: &[],
            sensor_kind: SensorKind::Usb,
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        });

        assert!(computation.results.is_empty());
        assert_eq!(computation.overall_score, 0);
        assert_eq!(computation.band, BalanceBand::HighMonitor);
    }
}

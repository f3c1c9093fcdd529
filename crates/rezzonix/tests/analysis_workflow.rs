use chrono::{NaiveDate, TimeZone, Utc};
use rezzonix::analysis::{
    AnalysisService, AnalysisSettings, AnalysisSubmission, BalanceBand, FixedClock,
    InMemoryAnalysisRepository, Organ, ScanInput, ScoringEngine, SensorKind,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn reference_submission() -> AnalysisSubmission {
    AnalysisSubmission {
        patient_name: "Test User".to_string(),
        patient_age: Some(35),
        selected_organs: vec![
            "Heart".to_string(),
            "Liver".to_string(),
            "Kidney".to_string(),
        ],
        sensor_type: "BLE".to_string(),
        sensor_name: None,
        frequency: None,
    }
}

#[test]
fn engine_reference_scenario_matches_contract() {
    let engine = ScoringEngine::new();
    let organs = [Organ::Heart, Organ::Liver, Organ::Kidney];
    let input = ScanInput {
        patient_name: "Test User",
        patient_age: Some(35),
        organs: &organs,
        sensor_kind: SensorKind::Ble,
        reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
    };

    let first = engine.compute(&input);
    let second = engine.compute(&input);

    assert_eq!(first, second);
    assert_eq!(first.results.len(), 3);
    assert!((35..=98).contains(&first.overall_score));
    assert!(first
        .results
        .windows(2)
        .all(|pair| pair[0].stress >= pair[1].stress));

    let expected_band = if first.overall_score >= 80 {
        BalanceBand::Balanced
    } else if first.overall_score >= 70 {
        BalanceBand::Monitor
    } else {
        BalanceBand::HighMonitor
    };
    assert_eq!(first.band, expected_band);
}

#[test]
fn analysis_record_serializes_with_wire_field_names() {
    let clock = FixedClock(
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    );
    let service = AnalysisService::with_clock(
        Arc::new(InMemoryAnalysisRepository::default()),
        AnalysisSettings::default(),
        Arc::new(clock),
    );

    let analysis = service
        .create_analysis(reference_submission())
        .expect("analysis created");
    let json = serde_json::to_value(&analysis).expect("serializes");

    for field in [
        "id",
        "patient_id",
        "patient_name",
        "patient_age",
        "selected_organs",
        "overall_score",
        "band",
        "results",
        "sensor_type",
        "sensor_name",
        "frequency",
        "created_at",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(json["created_at"], "2024-01-01T08:00:00Z");
    assert_eq!(json["frequency"], 528);

    let decoded: rezzonix::analysis::Analysis =
        serde_json::from_value(json).expect("deserializes");
    assert_eq!(decoded, analysis);
}

#[test]
fn concurrent_creations_never_share_identifiers() {
    let service = Arc::new(AnalysisService::new(
        Arc::new(InMemoryAnalysisRepository::default()),
        AnalysisSettings::default(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..25)
                    .map(|_| {
                        service
                            .create_analysis(reference_submission())
                            .expect("analysis created")
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().expect("worker finished") {
            assert!(ids.insert(id.0), "identifier reused");
        }
    }
    assert_eq!(ids.len(), 200);
    assert_eq!(service.list_analyses(Some(500)).expect("listing").len(), 200);
}

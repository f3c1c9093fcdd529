use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::analysis::clock::{Clock, FixedClock};
use crate::analysis::domain::{
    Analysis, AnalysisId, AnalysisSubmission, Patient, PatientSubmission,
};
use crate::analysis::repository::{
    AnalysisRepository, InMemoryAnalysisRepository, RepositoryError,
};
use crate::analysis::{analysis_router, AnalysisService, AnalysisSettings};

pub(super) fn new_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

pub(super) fn new_year_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn submission() -> AnalysisSubmission {
    AnalysisSubmission {
        patient_name: "Test User".to_string(),
        patient_age: Some(35),
        selected_organs: vec![
            "Heart".to_string(),
            "Liver".to_string(),
            "Kidney".to_string(),
        ],
        sensor_type: "BLE".to_string(),
        sensor_name: Some("RezzoniX Bio-Sensor X1".to_string()),
        frequency: None,
    }
}

pub(super) fn patient_submission() -> PatientSubmission {
    PatientSubmission {
        name: "Ada Lovelace".to_string(),
        age: Some(36),
    }
}

pub(super) fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(new_year_morning()))
}

pub(super) fn build_service() -> (
    Arc<AnalysisService<InMemoryAnalysisRepository>>,
    Arc<InMemoryAnalysisRepository>,
) {
    let repository = Arc::new(InMemoryAnalysisRepository::default());
    let service = Arc::new(AnalysisService::with_clock(
        repository.clone(),
        AnalysisSettings::default(),
        fixed_clock(),
    ));
    (service, repository)
}

pub(super) fn analysis_router_with_service(
    service: Arc<AnalysisService<InMemoryAnalysisRepository>>,
) -> axum::Router {
    analysis_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Repository whose writes always fail.
#[derive(Default)]
pub(super) struct UnavailableRepository;

impl AnalysisRepository for UnavailableRepository {
    fn insert_patient(&self, _patient: Patient) -> Result<Patient, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn patients(&self, _limit: usize) -> Result<Vec<Patient>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn insert_analysis(&self, _analysis: Analysis) -> Result<Analysis, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch_analysis(&self, _id: &AnalysisId) -> Result<Option<Analysis>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn analyses(&self, _limit: usize) -> Result<Vec<Analysis>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

/// Repository that reports every insert as a duplicate identifier.
#[derive(Default)]
pub(super) struct ConflictRepository;

impl AnalysisRepository for ConflictRepository {
    fn insert_patient(&self, _patient: Patient) -> Result<Patient, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn patients(&self, _limit: usize) -> Result<Vec<Patient>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_analysis(&self, _analysis: Analysis) -> Result<Analysis, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch_analysis(&self, _id: &AnalysisId) -> Result<Option<Analysis>, RepositoryError> {
        Ok(None)
    }

    fn analyses(&self, _limit: usize) -> Result<Vec<Analysis>, RepositoryError> {
        Ok(Vec::new())
    }
}

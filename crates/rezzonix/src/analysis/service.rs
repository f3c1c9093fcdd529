use std::sync::Arc;

use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::domain::{
    Analysis, AnalysisId, AnalysisRequest, AnalysisSubmission, Patient, PatientId,
    PatientSubmission,
};
use super::engine::{AnalysisComputation, ScanInput, ScoringEngine};
use super::intake::{IntakeGuard, IntakeViolation};
use super::repository::{AnalysisRepository, RepositoryError};
use super::settings::AnalysisSettings;

/// Service composing the intake guard, scoring engine, clock, and repository.
pub struct AnalysisService<R> {
    guard: IntakeGuard,
    engine: ScoringEngine,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    settings: AnalysisSettings,
}

impl<R> AnalysisService<R>
where
    R: AnalysisRepository + 'static,
{
    pub fn new(repository: Arc<R>, settings: AnalysisSettings) -> Self {
        Self::with_clock(repository, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, settings: AnalysisSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            guard: IntakeGuard::from_settings(&settings),
            engine: ScoringEngine::new(),
            repository,
            clock,
            settings,
        }
    }

    /// Register a patient under a fresh identifier.
    pub fn create_patient(
        &self,
        submission: PatientSubmission,
    ) -> Result<Patient, AnalysisServiceError> {
        let draft = self.guard.patient_from_submission(submission)?;
        let patient = Patient {
            id: PatientId::generate(),
            name: draft.name,
            age: draft.age,
            created_at: self.clock.now(),
        };

        let stored = self.repository.insert_patient(patient)?;
        info!(patient_id = %stored.id, "patient registered");
        Ok(stored)
    }

    pub fn list_patients(&self, limit: Option<usize>) -> Result<Vec<Patient>, AnalysisServiceError> {
        let limit = limit.unwrap_or(self.settings.patient_list_limit);
        Ok(self.repository.patients(limit)?)
    }

    /// Validate, score against today's date, and persist a scan.
    ///
    /// The embedded `patient_id` is minted per analysis; it is a snapshot of who was scanned,
    /// not a link to a registered `Patient`.
    pub fn create_analysis(
        &self,
        submission: AnalysisSubmission,
    ) -> Result<Analysis, AnalysisServiceError> {
        let request = match self.guard.request_from_submission(submission) {
            Ok(request) => request,
            Err(violation) => {
                warn!(%violation, "analysis submission rejected");
                return Err(violation.into());
            }
        };

        let created_at = self.clock.now();
        let computation = self.compute(&request, created_at.date_naive());

        let analysis = Analysis {
            id: AnalysisId::generate(),
            patient_id: PatientId::generate(),
            patient_name: request.patient_name,
            patient_age: request.patient_age,
            selected_organs: request.organs,
            overall_score: computation.overall_score,
            band: computation.band,
            results: computation.results,
            sensor_type: request.sensor_kind,
            sensor_name: request.sensor_name,
            frequency: request.frequency,
            created_at,
        };

        let stored = self.repository.insert_analysis(analysis)?;
        info!(
            analysis_id = %stored.id,
            organs = stored.results.len(),
            overall_score = stored.overall_score,
            band = %stored.band,
            "analysis recorded"
        );
        Ok(stored)
    }

    /// Run the engine for a validated request without touching the store.
    pub fn compute(
        &self,
        request: &AnalysisRequest,
        reference_date: chrono::NaiveDate,
    ) -> AnalysisComputation {
        self.engine.compute(&ScanInput {
            patient_name: &request.patient_name,
            patient_age: request.patient_age,
            organs: &request.organs,
            sensor_kind: request.sensor_kind,
            reference_date,
        })
    }

    pub fn get_analysis(&self, id: &AnalysisId) -> Result<Analysis, AnalysisServiceError> {
        let analysis = self
            .repository
            .fetch_analysis(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(analysis)
    }

    pub fn list_analyses(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<Analysis>, AnalysisServiceError> {
        let limit = limit.unwrap_or(self.settings.analysis_list_limit);
        Ok(self.repository.analyses(limit)?)
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AnalysisServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound))
    }
}

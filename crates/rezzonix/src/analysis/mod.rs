//! Organ balance scans: intake validation, deterministic scoring, and write-once storage.

pub mod catalog;
pub mod clock;
pub mod domain;
pub mod engine;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;
pub mod settings;

#[cfg(test)]
mod tests;

pub use catalog::{Organ, SensorKind};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Analysis, AnalysisId, AnalysisRequest, AnalysisSubmission, BalanceBand, ObservationNote,
    OrganResult, Patient, PatientId, PatientSubmission,
};
pub use engine::{AnalysisComputation, ScanInput, ScoringEngine};
pub use intake::{IntakeGuard, IntakeViolation, PatientDraft};
pub use repository::{
    AnalysisRepository, InMemoryAnalysisRepository, RecordIndex, RepositoryError,
};
pub use router::{analysis_router, ListQuery};
pub use service::{AnalysisService, AnalysisServiceError};
pub use settings::AnalysisSettings;

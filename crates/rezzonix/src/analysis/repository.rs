use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Analysis, AnalysisId, Patient};

/// Write-once storage for patients and analyses.
pub trait AnalysisRepository: Send + Sync {
    fn insert_patient(&self, patient: Patient) -> Result<Patient, RepositoryError>;
    fn patients(&self, limit: usize) -> Result<Vec<Patient>, RepositoryError>;
    fn insert_analysis(&self, analysis: Analysis) -> Result<Analysis, RepositoryError>;
    fn fetch_analysis(&self, id: &AnalysisId) -> Result<Option<Analysis>, RepositoryError>;
    fn analyses(&self, limit: usize) -> Result<Vec<Analysis>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Insertion-ordered record set with a shared identifier namespace.
///
/// Storage backends hold one of these behind a lock and only push a record after it has been
/// durably accepted, so readers never observe a partial write.
#[derive(Debug, Default)]
pub struct RecordIndex {
    patients: Vec<Patient>,
    analyses: Vec<Analysis>,
    analysis_positions: HashMap<String, usize>,
    issued_ids: HashSet<String>,
}

impl RecordIndex {
    pub fn contains_id(&self, id: &str) -> bool {
        self.issued_ids.contains(id)
    }

    pub fn push_patient(&mut self, patient: Patient) -> Result<(), RepositoryError> {
        if !self.issued_ids.insert(patient.id.0.clone()) {
            return Err(RepositoryError::Conflict);
        }
        self.patients.push(patient);
        Ok(())
    }

    pub fn push_analysis(&mut self, analysis: Analysis) -> Result<(), RepositoryError> {
        if !self.issued_ids.insert(analysis.id.0.clone()) {
            return Err(RepositoryError::Conflict);
        }
        self.analysis_positions
            .insert(analysis.id.0.clone(), self.analyses.len());
        self.analyses.push(analysis);
        Ok(())
    }

    pub fn analysis(&self, id: &AnalysisId) -> Option<&Analysis> {
        self.analysis_positions
            .get(&id.0)
            .and_then(|position| self.analyses.get(*position))
    }

    /// Newest first; equal timestamps list the later insertion first.
    pub fn recent_patients(&self, limit: usize) -> Vec<Patient> {
        let mut recent: Vec<Patient> = self.patients.iter().rev().cloned().collect();
        recent.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        recent.truncate(limit);
        recent
    }

    pub fn recent_analyses(&self, limit: usize) -> Vec<Analysis> {
        let mut recent: Vec<Analysis> = self.analyses.iter().rev().cloned().collect();
        recent.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        recent.truncate(limit);
        recent
    }

    /// `(patients, analyses)` currently held.
    pub fn counts(&self) -> (usize, usize) {
        (self.patients.len(), self.analyses.len())
    }
}

/// Process-local repository used by default and in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAnalysisRepository {
    index: Arc<Mutex<RecordIndex>>,
}

impl InMemoryAnalysisRepository {
    fn lock(&self) -> Result<MutexGuard<'_, RecordIndex>, RepositoryError> {
        self.index
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn insert_patient(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        let mut guard = self.lock()?;
        guard.push_patient(patient.clone())?;
        Ok(patient)
    }

    fn patients(&self, limit: usize) -> Result<Vec<Patient>, RepositoryError> {
        Ok(self.lock()?.recent_patients(limit))
    }

    fn insert_analysis(&self, analysis: Analysis) -> Result<Analysis, RepositoryError> {
        let mut guard = self.lock()?;
        guard.push_analysis(analysis.clone())?;
        Ok(analysis)
    }

    fn fetch_analysis(&self, id: &AnalysisId) -> Result<Option<Analysis>, RepositoryError> {
        Ok(self.lock()?.analysis(id).cloned())
    }

    fn analyses(&self, limit: usize) -> Result<Vec<Analysis>, RepositoryError> {
        Ok(self.lock()?.recent_analyses(limit))
    }
}

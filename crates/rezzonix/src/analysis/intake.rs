use super::catalog::{Organ, SensorKind};
use super::domain::{AnalysisRequest, AnalysisSubmission, PatientSubmission};
use super::settings::{AnalysisSettings, DEFAULT_FREQUENCY_HZ};

/// Validation errors raised before anything reaches the engine or the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("patient name must not be empty")]
    EmptyPatientName,
    #[error("patient age must be a non-negative integer (found {0})")]
    InvalidAge(i64),
    #[error("at least one organ must be selected")]
    NoOrgansSelected,
    #[error("unknown organ '{0}'")]
    UnknownOrgan(String),
    #[error("unknown sensor type '{0}' (expected BLE or USB)")]
    UnknownSensorKind(String),
    #[error("frequency must be greater than zero")]
    InvalidFrequency,
}

/// Validated patient registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDraft {
    pub name: String,
    pub age: Option<u32>,
}

/// Turns raw client payloads into typed requests.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    default_frequency: u32,
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self {
            default_frequency: DEFAULT_FREQUENCY_HZ,
        }
    }
}

impl IntakeGuard {
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        let default_frequency = if settings.default_frequency == 0 {
            DEFAULT_FREQUENCY_HZ
        } else {
            settings.default_frequency
        };
        Self { default_frequency }
    }

    pub fn patient_from_submission(
        &self,
        submission: PatientSubmission,
    ) -> Result<PatientDraft, IntakeViolation> {
        Ok(PatientDraft {
            name: normalize_name(&submission.name)?,
            age: normalize_age(submission.age)?,
        })
    }

    /// Validate a scan submission. Organ order and duplicates are preserved.
    pub fn request_from_submission(
        &self,
        submission: AnalysisSubmission,
    ) -> Result<AnalysisRequest, IntakeViolation> {
        let patient_name = normalize_name(&submission.patient_name)?;
        let patient_age = normalize_age(submission.patient_age)?;

        if submission.selected_organs.is_empty() {
            return Err(IntakeViolation::NoOrgansSelected);
        }
        let organs = submission
            .selected_organs
            .iter()
            .map(|raw| {
                Organ::from_label(raw).ok_or_else(|| IntakeViolation::UnknownOrgan(raw.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sensor_kind = SensorKind::from_label(&submission.sensor_type)
            .ok_or_else(|| IntakeViolation::UnknownSensorKind(submission.sensor_type.clone()))?;

        let sensor_name = submission
            .sensor_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let frequency = match submission.frequency {
            Some(0) => return Err(IntakeViolation::InvalidFrequency),
            Some(value) => value,
            None => self.default_frequency,
        };

        Ok(AnalysisRequest {
            patient_name,
            patient_age,
            organs,
            sensor_kind,
            sensor_name,
            frequency,
        })
    }
}

fn normalize_name(raw: &str) -> Result<String, IntakeViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IntakeViolation::EmptyPatientName);
    }
    Ok(trimmed.to_string())
}

fn normalize_age(raw: Option<i64>) -> Result<Option<u32>, IntakeViolation> {
    raw.map(|age| u32::try_from(age).map_err(|_| IntakeViolation::InvalidAge(age)))
        .transpose()
}

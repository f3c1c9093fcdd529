use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::catalog::{Organ, SensorKind};

/// Identifier wrapper for registered patients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(pub String);

/// Identifier wrapper for persisted analyses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub String);

impl PatientId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AnalysisId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw patient registration payload as received from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSubmission {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
}

/// Registered patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Raw scan payload as received from clients; validated by the intake guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSubmission {
    pub patient_name: String,
    #[serde(default)]
    pub patient_age: Option<i64>,
    pub selected_organs: Vec<String>,
    pub sensor_type: String,
    #[serde(default)]
    pub sensor_name: Option<String>,
    #[serde(default)]
    pub frequency: Option<u32>,
}

/// Validated scan request handed to the scoring engine and store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub patient_name: String,
    pub patient_age: Option<u32>,
    pub organs: Vec<Organ>,
    pub sensor_kind: SensorKind,
    pub sensor_name: Option<String>,
    pub frequency: u32,
}

/// Categorical summary of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceBand {
    #[serde(rename = "Balanced")]
    Balanced,
    #[serde(rename = "Monitor")]
    Monitor,
    #[serde(rename = "High-monitor")]
    HighMonitor,
}

impl BalanceBand {
    pub const fn label(self) -> &'static str {
        match self {
            BalanceBand::Balanced => "Balanced",
            BalanceBand::Monitor => "Monitor",
            BalanceBand::HighMonitor => "High-monitor",
        }
    }
}

impl fmt::Display for BalanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Supportive, non-diagnostic observation attached to each organ result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationNote {
    RoutineTracking,
    LifestyleMonitoring,
    ProfessionalFollowUp,
}

impl ObservationNote {
    pub const ALL: [ObservationNote; 3] = [
        ObservationNote::RoutineTracking,
        ObservationNote::LifestyleMonitoring,
        ObservationNote::ProfessionalFollowUp,
    ];

    /// Stress 0-3 tracks routinely, 4-6 watches lifestyle factors, 7+ pairs with a professional.
    pub const fn for_stress(stress: u8) -> Self {
        match stress {
            0..=3 => ObservationNote::RoutineTracking,
            4..=6 => ObservationNote::LifestyleMonitoring,
            _ => ObservationNote::ProfessionalFollowUp,
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            ObservationNote::RoutineTracking => {
                "Supportive observation: routine balance tracking is recommended."
            }
            ObservationNote::LifestyleMonitoring => {
                "Supportive observation: lifestyle, sleep and hydration balance can be monitored."
            }
            ObservationNote::ProfessionalFollowUp => {
                "Supportive observation: follow-up alongside a professional assessment is recommended."
            }
        }
    }

    pub fn from_text(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|note| note.text() == raw)
    }
}

impl Serialize for ObservationNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text())
    }
}

impl<'de> Deserialize<'de> for ObservationNote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObservationNote::from_text(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized observation note '{raw}'")))
    }
}

/// Per-organ balance metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganResult {
    pub organ: Organ,
    pub score: u8,
    pub stress: u8,
    pub note: ObservationNote,
}

/// Persisted scan record. Patient fields are a snapshot taken at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: AnalysisId,
    pub patient_id: PatientId,
    pub patient_name: String,
    pub patient_age: Option<u32>,
    pub selected_organs: Vec<Organ>,
    pub overall_score: u8,
    pub band: BalanceBand,
    pub results: Vec<OrganResult>,
    pub sensor_type: SensorKind,
    pub sensor_name: Option<String>,
    pub frequency: u32,
    pub created_at: DateTime<Utc>,
}

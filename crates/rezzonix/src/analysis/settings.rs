use serde::{Deserialize, Serialize};

pub const DEFAULT_FREQUENCY_HZ: u32 = 528;
pub const DEFAULT_PATIENT_LIST_LIMIT: usize = 100;
pub const DEFAULT_ANALYSIS_LIST_LIMIT: usize = 50;

/// Defaults applied by the analysis service when a request leaves them open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub default_frequency: u32,
    pub patient_list_limit: usize,
    pub analysis_list_limit: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            default_frequency: DEFAULT_FREQUENCY_HZ,
            patient_list_limit: DEFAULT_PATIENT_LIST_LIMIT,
            analysis_list_limit: DEFAULT_ANALYSIS_LIST_LIMIT,
        }
    }
}

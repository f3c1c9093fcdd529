use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rezzonix::analysis::{
    Analysis, AnalysisId, AnalysisRepository, InMemoryAnalysisRepository, Patient, RecordIndex,
    RepositoryError,
};
use rezzonix::config::StorageConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

const PATIENTS_FILE: &str = "patients.jsonl";
const ANALYSES_FILE: &str = "analyses.jsonl";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Append-only JSON-lines store replayed into memory on open.
///
/// A record is added to the index only after its line has been written and flushed.
pub(crate) struct JsonFileAnalysisRepository {
    inner: Mutex<FileStore>,
}

struct FileStore {
    index: RecordIndex,
    patients: File,
    analyses: File,
}

impl JsonFileAnalysisRepository {
    pub(crate) fn open(dir: &Path) -> Result<Self, RepositoryError> {
        fs::create_dir_all(dir).map_err(|err| unavailable(dir, err))?;

        let patients_path = dir.join(PATIENTS_FILE);
        let analyses_path = dir.join(ANALYSES_FILE);

        let mut index = RecordIndex::default();
        for patient in replay::<Patient>(&patients_path)? {
            index.push_patient(patient)?;
        }
        for analysis in replay::<Analysis>(&analyses_path)? {
            index.push_analysis(analysis)?;
        }

        let (patient_count, analysis_count) = index.counts();
        info!(
            dir = %dir.display(),
            patients = patient_count,
            analyses = analysis_count,
            "analysis store opened"
        );

        Ok(Self {
            inner: Mutex::new(FileStore {
                index,
                patients: append_handle(&patients_path)?,
                analyses: append_handle(&analyses_path)?,
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, FileStore>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("file store mutex poisoned".to_string()))
    }
}

impl AnalysisRepository for JsonFileAnalysisRepository {
    fn insert_patient(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.index.contains_id(&patient.id.0) {
            return Err(RepositoryError::Conflict);
        }
        append_line(&mut guard.patients, &patient)?;
        guard.index.push_patient(patient.clone())?;
        Ok(patient)
    }

    fn patients(&self, limit: usize) -> Result<Vec<Patient>, RepositoryError> {
        Ok(self.lock()?.index.recent_patients(limit))
    }

    fn insert_analysis(&self, analysis: Analysis) -> Result<Analysis, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.index.contains_id(&analysis.id.0) {
            return Err(RepositoryError::Conflict);
        }
        append_line(&mut guard.analyses, &analysis)?;
        guard.index.push_analysis(analysis.clone())?;
        Ok(analysis)
    }

    fn fetch_analysis(&self, id: &AnalysisId) -> Result<Option<Analysis>, RepositoryError> {
        Ok(self.lock()?.index.analysis(id).cloned())
    }

    fn analyses(&self, limit: usize) -> Result<Vec<Analysis>, RepositoryError> {
        Ok(self.lock()?.index.recent_analyses(limit))
    }
}

/// Repository selected at startup from `StorageConfig`.
pub(crate) enum ConfiguredRepository {
    Memory(InMemoryAnalysisRepository),
    File(JsonFileAnalysisRepository),
}

impl ConfiguredRepository {
    pub(crate) fn from_config(config: &StorageConfig) -> Result<Self, RepositoryError> {
        match &config.data_dir {
            Some(dir) => Ok(Self::File(JsonFileAnalysisRepository::open(dir)?)),
            None => Ok(Self::Memory(InMemoryAnalysisRepository::default())),
        }
    }

    pub(crate) fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "jsonl",
        }
    }

    fn inner(&self) -> &dyn AnalysisRepository {
        match self {
            Self::Memory(repository) => repository,
            Self::File(repository) => repository,
        }
    }
}

impl AnalysisRepository for ConfiguredRepository {
    fn insert_patient(&self, patient: Patient) -> Result<Patient, RepositoryError> {
        self.inner().insert_patient(patient)
    }

    fn patients(&self, limit: usize) -> Result<Vec<Patient>, RepositoryError> {
        self.inner().patients(limit)
    }

    fn insert_analysis(&self, analysis: Analysis) -> Result<Analysis, RepositoryError> {
        self.inner().insert_analysis(analysis)
    }

    fn fetch_analysis(&self, id: &AnalysisId) -> Result<Option<Analysis>, RepositoryError> {
        self.inner().fetch_analysis(id)
    }

    fn analyses(&self, limit: usize) -> Result<Vec<Analysis>, RepositoryError> {
        self.inner().analyses(limit)
    }
}

/// Load every record from `path`.
///
/// An unterminated final line is the trace of an interrupted append: it is dropped when it
/// does not parse and newline-terminated when it does. Corrupt terminated lines are fatal.
fn replay<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RepositoryError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(unavailable(path, err)),
    };

    let mut records = Vec::new();
    let mut offset = 0;
    let mut line_number = 0;
    while offset < bytes.len() {
        line_number += 1;
        let rest = &bytes[offset..];
        let (line, terminated) = match rest.iter().position(|byte| *byte == b'\n') {
            Some(end) => (&rest[..end], true),
            None => (rest, false),
        };

        if !line.iter().all(u8::is_ascii_whitespace) {
            match serde_json::from_slice(line) {
                Ok(record) => records.push(record),
                Err(err) if !terminated => {
                    warn!(
                        path = %path.display(),
                        line = line_number,
                        error = %err,
                        "dropping torn trailing record"
                    );
                    truncate_to(path, offset as u64)?;
                    return Ok(records);
                }
                Err(err) => {
                    return Err(RepositoryError::Unavailable(format!(
                        "{}:{}: corrupt record ({err})",
                        path.display(),
                        line_number
                    )))
                }
            }
            if !terminated {
                append_handle(path)?
                    .write_all(b"\n")
                    .map_err(|err| unavailable(path, err))?;
            }
        }

        offset += line.len() + 1;
    }
    Ok(records)
}

fn truncate_to(path: &Path, len: u64) -> Result<(), RepositoryError> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .and_then(|file| file.set_len(len).and_then(|_| file.sync_data()))
        .map_err(|err| unavailable(path, err))
}

fn append_handle(path: &Path) -> Result<File, RepositoryError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| unavailable(path, err))
}

/// Append one record, rolling the file back to its previous length if the write fails.
fn append_line<T: Serialize>(file: &mut File, record: &T) -> Result<(), RepositoryError> {
    let mut line = serde_json::to_vec(record)
        .map_err(|err| RepositoryError::Unavailable(format!("failed to encode record ({err})")))?;
    line.push(b'\n');

    let start = file
        .metadata()
        .map_err(|err| RepositoryError::Unavailable(format!("failed to stat store ({err})")))?
        .len();

    if let Err(err) = file.write_all(&line).and_then(|_| file.sync_data()) {
        return Err(match file.set_len(start) {
            Ok(()) => RepositoryError::Unavailable(format!("failed to append record ({err})")),
            Err(rollback) => RepositoryError::Unavailable(format!(
                "failed to append record ({err}); rollback failed ({rollback})"
            )),
        });
    }
    Ok(())
}

fn unavailable(path: &Path, err: std::io::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {err}", path.display()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

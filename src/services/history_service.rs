use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::PriceSample;
use crate::utils::write_atomic;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("history file {path} is not a JSON array: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize history for {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HistoryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Outcome of persisting one run's samples
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistoryReport {
    pub written: usize,
    pub skipped: usize,
}

/// `<dir>/<id>.json`
pub fn history_file(dir: &Path, id: u64) -> PathBuf {
    dir.join(format!("{}.json", id))
}

/// Read a coin's history, newest record first. A missing file is an empty history.
pub async fn read_history(dir: &Path, id: u64) -> Result<Vec<Value>, HistoryError> {
    let path = history_file(dir, id);

    match tokio::fs::read(&path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| HistoryError::Corrupt {
            path: path.display().to_string(),
            source,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(HistoryError::io(&path, e)),
    }
}

/// Put `sample` in front of the coin's existing records and rewrite the file.
///
/// Existing records are carried over verbatim; nothing is deduplicated or
/// reordered. Returns the number of records now on disk.
pub async fn append_sample(dir: &Path, sample: &PriceSample) -> Result<usize, HistoryError> {
    let existing = read_history(dir, sample.id).await?;

    let mut records = Vec::with_capacity(existing.len() + 1);
    records.push(sample.history_record());
    records.extend(existing);

    let path = history_file(dir, sample.id);
    let body = serde_json::to_vec(&records).map_err(|source| HistoryError::Serialize {
        path: path.display().to_string(),
        source,
    })?;
    write_atomic(&path, &body)
        .await
        .map_err(|e| HistoryError::io(&path, e))?;

    Ok(records.len())
}

/// Append every sample of a run. A coin whose history cannot be read or
/// written is skipped with a warning and its file is left as it was.
pub async fn write_all_samples(dir: &Path, samples: &[PriceSample]) -> HistoryReport {
    let mut report = HistoryReport::default();

    for sample in samples {
        match append_sample(dir, sample).await {
            Ok(len) => {
                debug!("History for {} now has {} records", sample.id, len);
                report.written += 1;
            }
            Err(e) => {
                warn!("Skipping price history for {}: {}", sample.id, e);
                report.skipped += 1;
            }
        }
    }

    report
}

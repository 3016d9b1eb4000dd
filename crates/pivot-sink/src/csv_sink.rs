//! CSV-file result sink.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use pivot_core::error::SinkError;
use pivot_core::traits::ResultSink;
use pivot_core::types::{SignalKey, SignalRow};

/// Result sink that persists rows to a single CSV file.
///
/// The file is treated as a keyed table: on creation any existing file
/// is loaded into the map, upserts overwrite non-key fields, and every
/// batch rewrites the file sorted by key. Re-running on identical
/// input therefore produces a byte-identical file.
pub struct CsvSink {
    path: PathBuf,
    rows: Mutex<BTreeMap<SignalKey, SignalRow>>,
}

impl CsvSink {
    /// Open a sink at the given path, loading any existing rows.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let rows = if path.is_file() {
            load_existing(&path)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            rows: Mutex::new(rows),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct keys held.
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Check if the sink holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_all(&self, rows: &BTreeMap<SignalKey, SignalRow>) -> Result<(), SinkError> {
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| SinkError::WriteError(e.to_string()))?;

        for row in rows.values() {
            writer
                .serialize(row)
                .map_err(|e| SinkError::Serialization(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| SinkError::WriteError(e.to_string()))?;
        Ok(())
    }
}

fn load_existing(path: &Path) -> Result<BTreeMap<SignalKey, SignalRow>, SinkError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| SinkError::Internal(e.to_string()))?;

    let mut rows = BTreeMap::new();
    for result in reader.deserialize() {
        let row: SignalRow = result.map_err(|e| SinkError::Serialization(e.to_string()))?;
        rows.insert(row.key(), row);
    }
    Ok(rows)
}

#[async_trait]
impl ResultSink for CsvSink {
    async fn upsert(&self, rows: &[SignalRow]) -> Result<(), SinkError> {
        let mut map = self.rows.lock().unwrap();
        for row in rows {
            map.insert(row.key(), row.clone());
        }
        // Rewrite while holding the lock so concurrent batches cannot
        // interleave partial files.
        self.write_all(&map)?;
        tracing::debug!(
            rows = rows.len(),
            total = map.len(),
            file = %self.path.display(),
            "upserted signal rows"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

//! Append-only analysis log
//!
//! One CSV file with a fixed header, written on the first append. Rows are
//! encoded in memory and written with a single append while the writer lock
//! is held, so concurrent analyses never interleave and a failed analysis
//! never leaves a partial row.

use callscope_core::AnalysisRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::Result;

pub const DEFAULT_LOG_FILE: &str = "call_analysis.csv";

pub struct AnalysisLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl AnalysisLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new or empty
    pub async fn append(&self, record: &AnalysisRecord) -> Result<()> {
        let _guard = self.writer.lock().await;

        let needs_header = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        let bytes = encode(record, needs_header)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), bytes = bytes.len(), header = needs_header, "Appended analysis row");
        Ok(())
    }

    /// Read every row back; a missing log is empty
    pub async fn read_all(&self) -> Result<Vec<AnalysisRecord>> {
        let Some(bytes) = self.raw().await? else {
            return Ok(Vec::new());
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());

        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<AnalysisRecord>, csv::Error>>()?;
        Ok(records)
    }

    /// Raw file contents, `None` until the first append
    pub async fn raw(&self) -> Result<Option<Vec<u8>>> {
        let _guard = self.writer.lock().await;

        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn encode(record: &AnalysisRecord, header: bool) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if header {
        writer.write_record(AnalysisRecord::HEADER)?;
    }
    writer.serialize(record)?;

    writer
        .into_inner()
        .map_err(|e| crate::StorageError::Io(e.into_error()))
}

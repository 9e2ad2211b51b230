//! JSON Lines file writer

use crate::error::{Error, Result};
use crate::types::ExtractedRecord;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON Lines file writer
///
/// Records go to a sibling `.tmp` file that replaces the destination on
/// `close`. If the writer is dropped or `close` fails, the temp file is
/// removed and the destination is left as it was.
pub struct JsonlWriter {
    /// Buffered temp file, taken on close
    writer: Option<BufWriter<File>>,
    /// Temp file path
    tmp_path: PathBuf,
    /// Final file path
    path: PathBuf,
    /// Number of rows written
    rows_written: usize,
    /// Set once the temp file has been renamed into place
    committed: bool,
}

impl JsonlWriter {
    /// Create a writer for `path`, creating parent directories as needed
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::output(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let file = File::create(&tmp_path).map_err(|e| {
            Error::output(format!("Failed to create file {}: {e}", tmp_path.display()))
        })?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            tmp_path,
            path,
            rows_written: 0,
            committed: false,
        })
    }

    /// Write one record as a line
    pub fn write(&mut self, record: &ExtractedRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::output("Writer already closed"))?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and move the file into place
    pub fn close(mut self) -> Result<usize> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| Error::output("Writer already closed"))?;

        let file = writer.into_inner().map_err(|e| {
            Error::output(format!("Failed to flush {}: {e}", self.tmp_path.display()))
        })?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.tmp_path, &self.path).map_err(|e| {
            Error::output(format!(
                "Failed to move output to {}: {e}",
                self.path.display()
            ))
        })?;
        self.committed = true;

        debug!(path = %self.path.display(), rows = self.rows_written, "Wrote JSONL file");
        Ok(self.rows_written)
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Close the handle before unlinking
        drop(self.writer.take());
        if let Err(e) = fs::remove_file(&self.tmp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.tmp_path.display(), error = %e, "Failed to remove temp file");
            }
        }
    }
}

/// Write records to a JSON Lines file, replacing any previous content
pub fn write_jsonl(path: impl AsRef<Path>, records: &[ExtractedRecord]) -> Result<usize> {
    let mut writer = JsonlWriter::create(path)?;
    for record in records {
        writer.write(record)?;
    }
    writer.close()
}

/// Remove a previous output file so it cannot be mistaken for this run's
///
/// Returns whether a file was removed.
pub fn remove_output(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed previous output");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::output(format!(
            "Failed to remove previous output {}: {e}",
            path.display()
        ))),
    }
}

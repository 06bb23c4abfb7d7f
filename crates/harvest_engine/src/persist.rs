use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid output filename: {0:?}")]
    InvalidFilename(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Prepares the directory snapshots and images are saved into, creating it
/// when absent. Fails if the path is a file or nothing can be written there.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |err: io::Error| PersistError::OutputDir(format!("{}: {err}", dir.display()));
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )))
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(unusable)?;
        }
        Err(err) => return Err(unusable(err)),
    }
    // A throwaway temp file proves the run can save into it.
    NamedTempFile::new_in(dir).map_err(unusable)?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        if filename.is_empty() || filename.contains(&['/', '\\'][..]) || filename == ".." {
            return Err(PersistError::InvalidFilename(filename.to_string()));
        }

        let target = self.dir.join(filename);
        // The temp file is removed on drop if anything below fails.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep reruns deterministic.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Destination for harvested payloads.
pub trait FileSink: Send + Sync {
    /// Stores `payload` unmodified under `filename` and returns where it went.
    fn save(&self, payload: &[u8], filename: &str) -> Result<PathBuf, PersistError>;
}

/// Saves every payload as a file in one output directory.
pub struct DirectorySink {
    writer: AtomicFileWriter,
}

impl DirectorySink {
    /// Creates the directory if needed and checks it is writable.
    pub fn new(dir: PathBuf) -> Result<Self, PersistError> {
        ensure_output_dir(&dir)?;
        Ok(Self {
            writer: AtomicFileWriter::new(dir),
        })
    }
}

impl FileSink for DirectorySink {
    fn save(&self, payload: &[u8], filename: &str) -> Result<PathBuf, PersistError> {
        self.writer.write(filename, payload)
    }
}

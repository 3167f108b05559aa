use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::foundation::error::{PosecardError, PosecardResult};

/// Receiver of finished composites, the headless counterpart of a browser download.
pub trait DownloadSink: Send {
    /// Store `bytes` under `filename`. Either the whole file is stored or nothing is.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> PosecardResult<()>;
}

/// Writes composites into a directory.
///
/// Bytes go to a hidden temporary file next to the target which is then renamed into place.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths saved so far, in save order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_atomically(&self, target: &Path, tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut f = fs::File::create(tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        drop(f);
        fs::rename(tmp, target)
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> PosecardResult<()> {
        if filename.is_empty()
            || filename.starts_with('.')
            || filename.contains(['/', '\\'])
        {
            return Err(PosecardError::export(format!(
                "refusing to save under unsafe filename '{filename}'"
            )));
        }

        let target = self.dir.join(filename);
        let tmp = self
            .dir
            .join(format!(".{filename}.{}.partial", std::process::id()));
        if let Err(e) = self.write_atomically(&target, &tmp, bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(PosecardError::export(format!(
                "write '{}': {e}",
                target.display()
            )));
        }

        tracing::info!(path = %target.display(), bytes = bytes.len(), "saved composite");
        self.written.push(target);
        Ok(())
    }
}

/// Keeps saved composites in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(filename, bytes)` pairs in save order.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }
}

impl DownloadSink for InMemorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> PosecardResult<()> {
        self.files.push((filename.to_owned(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;

//! Output directory and destination file lifecycle.
//!
//! Bytes are streamed through a bounded buffer into a `.part` file that is
//! unique to one transfer attempt, and the file is moved to its final name
//! only after a complete transfer. The move never replaces an existing
//! destination, so a file at the final path always means "done".

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::error::Error;

/// Suffix of in-progress files (`<name>.<random>.part`).
pub const TEMP_SUFFIX: &str = ".part";

/// Creates `dir` and its parents if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<(), Error> {
    if dir.is_dir() {
        return Ok(());
    }
    tracing::info!("directory [{}] does not exist, creating it", dir.display());
    fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}

/// How [`FileSink::finalize`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Committed {
    /// The file is now at its final path.
    Saved,
    /// Another transfer put a file at the final path first; ours was dropped.
    AlreadyPresent,
}

/// Buffered writer for one destination file.
pub struct FileSink {
    writer: BufWriter<File>,
    /// Set when writing to a temp file that still has to be moved into place.
    temp: Option<TempPath>,
    final_path: PathBuf,
}

impl FileSink {
    /// Opens the file that receives the body.
    ///
    /// With `atomic` the bytes go to a fresh `.part` file next to
    /// `final_path`; concurrent attempts for the same name never share it.
    /// Without `atomic` the destination itself is created, and an existing
    /// destination fails with [`io::ErrorKind::AlreadyExists`].
    pub fn create(final_path: &Path, atomic: bool, buffer_bytes: usize) -> io::Result<Self> {
        let (file, temp) = if atomic {
            let dir = final_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let prefix = final_path
                .file_name()
                .map(|n| format!("{}.", n.to_string_lossy()))
                .unwrap_or_default();
            let (file, temp) = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(TEMP_SUFFIX)
                .tempfile_in(dir)?
                .into_parts();
            (file, Some(temp))
        } else {
            let file = File::options()
                .write(true)
                .create_new(true)
                .open(final_path)?;
            (file, None)
        };
        Ok(Self {
            writer: BufWriter::with_capacity(buffer_bytes.max(8 * 1024), file),
            temp,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Path the bytes are currently written to.
    pub fn write_path(&self) -> &Path {
        self.temp.as_deref().unwrap_or(&self.final_path)
    }

    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)
    }

    /// Flushes, syncs and moves the file to its final name without
    /// replacing a file that appeared there in the meantime.
    pub fn finalize(self) -> io::Result<Committed> {
        let FileSink {
            writer,
            temp,
            final_path,
        } = self;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        let Some(temp) = temp else {
            return Ok(Committed::Saved);
        };
        match temp.persist_noclobber(&final_path) {
            Ok(()) => Ok(Committed::Saved),
            // Dropping the returned path removes our copy.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(Committed::AlreadyPresent),
            Err(e) => Err(e.error),
        }
    }

    /// Drops the incomplete file so the next run fetches it again.
    pub fn discard(self) {
        let FileSink {
            writer,
            temp,
            final_path,
        } = self;
        // into_parts skips the flush a plain drop would attempt.
        let (file, _) = writer.into_parts();
        drop(file);
        let removed = match temp {
            Some(temp) => temp.close(),
            None => fs::remove_file(&final_path),
        };
        if let Err(e) = removed {
            tracing::warn!("could not remove incomplete file for {}: {}", final_path.display(), e);
        }
    }
}

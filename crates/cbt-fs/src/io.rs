//! Atomic fragment writes

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A temp file staged next to its target.
///
/// Dropped without [`StagedFile::commit`], it removes itself, so a failed
/// write never leaves debris beside the fragments the host imports.
struct StagedFile {
    target: PathBuf,
    path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl StagedFile {
    fn create(target: &Path) -> Result<Self> {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = target.with_file_name(format!(".{name}.{}.tmp", std::process::id()));

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        Ok(Self {
            target: target.to_path_buf(),
            path,
            file: Some(file),
            committed: false,
        })
    }

    /// Fill the staged file under an exclusive lock and flush it to disk.
    fn fill<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> std::io::Result<()>,
    {
        let target = self.target.clone();
        let lock_failed = || Error::LockFailed {
            path: target.clone(),
        };
        let Some(file) = self.file.as_mut() else {
            return Err(lock_failed());
        };

        file.lock_exclusive().map_err(|_| lock_failed())?;
        write(file).map_err(|e| Error::io(&self.path, e))?;
        file.sync_all().map_err(|e| Error::io(&self.path, e))?;
        FileExt::unlock(file).map_err(|_| lock_failed())
    }

    /// Move the staged file over the target.
    fn commit(mut self) -> Result<()> {
        // Handle must be closed before the rename on Windows
        self.file.take();
        fs::rename(&self.path, &self.target).map_err(|e| Error::io(&self.target, e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged file");
            }
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Content is staged in a temp file beside the target and renamed over it,
/// so the build host never imports a half-written fragment. The parent
/// directory is created when missing.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    write_atomic_with(path, |file| file.write_all(content))?;
    tracing::debug!(path = %path, bytes = content.len(), "Wrote file");
    Ok(())
}

fn write_atomic_with<F>(path: &NormalizedPath, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let target = path.to_native();

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut staged = StagedFile::create(&target)?;
    staged.fill(write)?;
    staged.commit()
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

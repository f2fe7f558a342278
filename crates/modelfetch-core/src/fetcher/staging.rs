//! Per-task staging areas inside a destination directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Unique staging directory under `<dest>/<staging_dir_name>/`.
pub(crate) struct StagingArea {
    dir: TempDir,
    root: PathBuf,
}

impl StagingArea {
    /// Creates the shared parent if needed and a unique child inside it.
    /// Another task may remove an empty parent in between; that is retried once.
    pub(crate) fn create(dest: &Path, staging_dir_name: &str) -> io::Result<Self> {
        let root = dest.join(staging_dir_name);
        let mut attempt = 0;
        loop {
            fs::create_dir_all(&root)?;
            match tempfile::Builder::new().prefix("task-").tempdir_in(&root) {
                Ok(dir) => return Ok(Self { dir, root }),
                Err(e) if e.kind() == io::ErrorKind::NotFound && attempt == 0 => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Removes the task directory, then the shared parent if it is empty.
    /// Errors are logged; they never change the task status.
    pub(crate) fn remove(self) {
        let root = self.root;
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(staging = %path.display(), error = %e, "cleanup warning: staging directory not removed");
        }
        // Fails harmlessly while other tasks still stage here.
        let _ = fs::remove_dir(&root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn areas_are_unique_and_parent_goes_when_empty() {
        let dest = tempfile::tempdir().unwrap();
        let a = StagingArea::create(dest.path(), ".temp_download").unwrap();
        let b = StagingArea::create(dest.path(), ".temp_download").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(a.root(), dest.path().join(".temp_download"));

        a.remove();
        assert!(dest.path().join(".temp_download").exists());
        b.remove();
        assert!(!dest.path().join(".temp_download").exists());
    }
}

//! Preallocated staged file shared by segment workers.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A staged file sized up front. Clones share the handle; every write is
/// positional, so segments land independently of each other.
#[derive(Clone)]
pub struct StagedFile {
    file: Arc<File>,
}

impl StagedFile {
    /// Creates (truncating) `path` and reserves `size` bytes for it.
    pub fn create_sized(path: &Path, size: u64) -> io::Result<Self> {
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        reserve(&file, size)?;
        Ok(Self { file: Arc::new(file) })
    }

    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        use std::os::unix::fs::FileExt;
        self.file.write_all_at(data, offset)
    }

    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        use std::os::windows::fs::FileExt;
        let mut done = 0;
        while done < data.len() {
            done += self.file.seek_write(&data[done..], offset + done as u64)?;
        }
        Ok(())
    }

    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// Allocates real blocks where the filesystem supports it, so a full disk
/// fails here instead of mid-transfer.
#[cfg(unix)]
fn reserve(file: &File, size: u64) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor belongs to `file`, which outlives the call.
    let r = unsafe { libc::posix_fallocate(file.as_raw_fd(), 0, size as libc::off_t) };
    match r {
        0 => Ok(()),
        libc::ENOSPC => Err(io::Error::from_raw_os_error(r)),
        _ => {
            tracing::debug!(errno = r, "posix_fallocate unsupported, using set_len");
            file.set_len(size)
        }
    }
}

#[cfg(not(unix))]
fn reserve(file: &File, size: u64) -> io::Result<()> {
    file.set_len(size)
}

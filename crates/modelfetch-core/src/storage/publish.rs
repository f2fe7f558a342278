//! Move a finished staged file into its destination.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path used while copying across filesystems: `file.bin` → `file.bin.part`.
pub fn part_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

/// Publishes `staged` at `final_path` with a single rename. If the rename
/// crosses filesystems, copies into the `.part` sibling first and renames that,
/// so `final_path` never shows a partial file. The `.part` sibling is removed
/// if the copy fails.
pub fn publish(staged: &Path, final_path: &Path) -> io::Result<()> {
    match fs::rename(staged, final_path) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            let part = part_path(final_path);
            tracing::debug!(
                from = %staged.display(),
                to = %part.display(),
                "rename crosses filesystems, copying"
            );
            let copied = fs::copy(staged, &part).and_then(|_| fs::rename(&part, final_path));
            if copied.is_err() {
                let _ = fs::remove_file(&part);
            }
            copied?;
            let _ = fs::remove_file(staged);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/m/model.safetensors")),
            PathBuf::from("/m/model.safetensors.part")
        );
    }

    #[test]
    fn publish_renames_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("staged.bin");
        let dest = dir.path().join("final.bin");
        fs::write(&staged, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();
        publish(&staged, &dest).unwrap();
        assert!(!staged.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn publish_missing_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = publish(&dir.path().join("nope"), &dir.path().join("x")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dir.path().join("x").exists());
    }
}

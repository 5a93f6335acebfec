use std::{io, path::Path};

use super::{EntryKind, Filesystem};

/// Filesystem backed by the host operating system,
///
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl Filesystem for OsFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }

    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        let metadata = std::fs::metadata(path)?;
        if metadata.is_dir() {
            Ok(EntryKind::Directory)
        } else {
            Ok(EntryKind::File)
        }
    }
}

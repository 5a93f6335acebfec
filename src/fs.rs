use std::{io, path::Path};

mod os_fs;
pub use os_fs::OsFs;

mod mem_fs;
pub use mem_fs::MemFs;

/// Kind of entry found at a path,
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Filesystem capabilities needed to persist mirror configuration,
///
/// Errors keep their `std::io::ErrorKind` so callers can tell a missing path apart from other failures.
///
pub trait Filesystem {
    /// Creates a directory and all of its missing parents,
    ///
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Writes contents to a file, replacing it if it already exists,
    ///
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Removes a directory and everything under it,
    ///
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Returns what kind of entry exists at path,
    ///
    fn stat(&self, path: &Path) -> io::Result<EntryKind>;
}

impl<T> Filesystem for &T
where
    T: Filesystem + ?Sized,
{
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        (**self).write(path, contents)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).remove_dir_all(path)
    }

    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        (**self).stat(path)
    }
}

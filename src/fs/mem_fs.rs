use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use super::{EntryKind, Filesystem};

/// Entry stored in the in-memory tree
#[derive(Debug, Clone)]
enum Entry {
    File(Vec<u8>),
    Directory,
}

/// In-memory filesystem, useful for rendering configuration without touching the host,
///
#[derive(Debug, Default)]
pub struct MemFs {
    entries: Mutex<BTreeMap<PathBuf, Entry>>,
}

impl MemFs {
    /// Returns the contents of a file,
    ///
    pub fn read(&self, path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
        match self.entries()?.get(path.as_ref()) {
            Some(Entry::File(contents)) => Ok(contents.clone()),
            Some(Entry::Directory) => Err(is_a_directory(path.as_ref())),
            None => Err(not_found(path.as_ref())),
        }
    }

    /// Returns the paths of every file currently stored,
    ///
    pub fn files(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .entries()?
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::File(_)))
            .map(|(path, _)| path.clone())
            .collect())
    }

    fn entries(&self) -> io::Result<MutexGuard<'_, BTreeMap<PathBuf, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "in-memory filesystem lock poisoned"))
    }
}

impl Filesystem for MemFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut entries = self.entries()?;

        let mut ancestors = path
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .collect::<Vec<_>>();
        ancestors.reverse();

        for dir in ancestors {
            match entries.get(dir) {
                Some(Entry::File(_)) => return Err(not_a_directory(dir)),
                Some(Entry::Directory) => {}
                None => {
                    entries.insert(dir.to_path_buf(), Entry::Directory);
                }
            }
        }

        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut entries = self.entries()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            match entries.get(parent) {
                Some(Entry::Directory) => {}
                Some(Entry::File(_)) => return Err(not_a_directory(parent)),
                None => return Err(not_found(parent)),
            }
        }

        if let Some(Entry::Directory) = entries.get(path) {
            return Err(is_a_directory(path));
        }

        entries.insert(path.to_path_buf(), Entry::File(contents.to_vec()));
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut entries = self.entries()?;

        match entries.get(path) {
            Some(Entry::Directory) => {
                entries.retain(|p, _| !p.starts_with(path));
                Ok(())
            }
            Some(Entry::File(_)) => Err(not_a_directory(path)),
            None => Err(not_found(path)),
        }
    }

    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        match self.entries()?.get(path) {
            Some(Entry::File(_)) => Ok(EntryKind::File),
            Some(Entry::Directory) => Ok(EntryKind::Directory),
            None => Err(not_found(path)),
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

fn not_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("{} is not a directory", path.display()),
    )
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("{} is a directory", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use std::{io::ErrorKind, path::Path};

    use super::MemFs;
    use crate::fs::{EntryKind, Filesystem};

    #[test]
    fn test_create_write_remove() {
        let fs = MemFs::default();
        let dir = Path::new("/etc/containerd/certs.d/docker.io");

        fs.create_dir_all(dir).expect("should create dirs");
        assert_eq!(
            EntryKind::Directory,
            fs.stat(Path::new("/etc/containerd")).expect("parent should exist")
        );

        let file = dir.join("hosts.toml");
        fs.write(&file, b"first").expect("should write");
        fs.write(&file, b"second").expect("should overwrite");
        assert_eq!(b"second".to_vec(), fs.read(&file).expect("should read"));
        assert_eq!(vec![file.clone()], fs.files().expect("should list"));

        fs.remove_dir_all(dir).expect("should remove");
        assert_eq!(ErrorKind::NotFound, fs.stat(dir).unwrap_err().kind());
        assert_eq!(ErrorKind::NotFound, fs.stat(&file).unwrap_err().kind());
        assert_eq!(
            EntryKind::Directory,
            fs.stat(Path::new("/etc/containerd/certs.d")).expect("root should remain")
        );
    }

    #[test]
    fn test_write_requires_parent() {
        let fs = MemFs::default();
        let err = fs
            .write(Path::new("/etc/containerd/certs.d/hosts.toml"), b"")
            .unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn test_remove_missing_dir() {
        let fs = MemFs::default();
        let err = fs
            .remove_dir_all(Path::new("/etc/containerd/certs.d/docker.io"))
            .unwrap_err();
        assert_eq!(ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn test_remove_file_is_not_a_directory() {
        let fs = MemFs::default();
        fs.create_dir_all(Path::new("/tmp")).expect("should create");
        fs.write(Path::new("/tmp/file"), b"").expect("should write");

        let err = fs.remove_dir_all(Path::new("/tmp/file")).unwrap_err();
        assert_eq!(ErrorKind::Other, err.kind());
    }

    #[test]
    fn test_remove_keeps_siblings_with_common_prefix() {
        let fs = MemFs::default();
        fs.create_dir_all(Path::new("/certs.d/foo")).expect("should create");
        fs.create_dir_all(Path::new("/certs.d/foo.bar")).expect("should create");

        fs.remove_dir_all(Path::new("/certs.d/foo")).expect("should remove");
        assert!(fs.stat(Path::new("/certs.d/foo.bar")).is_ok());
    }
}

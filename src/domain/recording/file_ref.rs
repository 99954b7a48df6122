//! File reference value object

use std::fmt;
use std::path::{Path, PathBuf};

/// Reference to a single audio file on disk.
///
/// Used both for the overwritable recording and for read-only bundled assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRef {
    path: PathBuf,
}

impl FileRef {
    /// Create a reference to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The referenced path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used while a new version of this file is being written
    pub fn partial_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".part");
        self.path.with_file_name(name)
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl AsRef<Path> for FileRef {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

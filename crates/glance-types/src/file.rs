// ABOUTME: Identity types for workspace files and navigation trees
// ABOUTME: Equality is defined by canonical path or stable id, never by reference

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque handle for a file in the workspace.
///
/// Two handles are the same file when their paths are equal. The path is
/// expected to be canonical already; normalisation belongs to whoever
/// hands out handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used for tab titles and log output
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for FileHandle {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for FileHandle {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for FileHandle {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Navigation tree identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(pub u64);

impl TreeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TreeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_handle_identity_is_path() {
        let a = FileHandle::new("/work/src/main.rs");
        let b = FileHandle::from(PathBuf::from("/work/src/main.rs"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&FileHandle::new("/work/src/lib.rs")));
    }

    #[test]
    fn test_file_handle_name() {
        assert_eq!(FileHandle::new("/work/src/main.rs").name(), "main.rs");
        assert_eq!(FileHandle::new("/").name(), "");
    }

    #[test]
    fn test_tree_id() {
        let id = TreeId::new(7);
        assert_eq!(id.as_u64(), 7);

        let id2: TreeId = 9.into();
        assert_eq!(id2.0, 9);
        assert_eq!(id2.to_string(), "tree#9");
    }
}

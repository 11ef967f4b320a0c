//! Port to the shared notebook volume.

use std::path::Path;

/// Creates per-user directories on the shared volume.
pub trait UserStorage: Send + Sync {
    /// Make sure `path` exists. An existing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be created.
    fn ensure_directory(&self, path: &Path) -> std::io::Result<()>;
}

/// Storage backed by the hub's local mount of the shared volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalUserStorage;

impl UserStorage for LocalUserStorage {
    fn ensure_directory(&self, path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn ensure_directory_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("users").join("alice");

        LocalUserStorage.ensure_directory(&path).unwrap();
        LocalUserStorage.ensure_directory(&path).unwrap();

        assert!(path.is_dir());
        assert_eq!(std::fs::read_dir(root.path().join("users")).unwrap().count(), 1);
    }

    #[test]
    fn ensure_directory_fails_over_a_file() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("users");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = LocalUserStorage.ensure_directory(&blocker.join("alice"));

        assert!(result.is_err());
    }
}

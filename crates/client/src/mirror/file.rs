//! File-backed mirror storage.
//!
//! One JSON file per key under the configured data directory. Writes
//! replace the whole file; there is no journaling, matching the mirror's
//! no-transactional-guarantees contract.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{MirrorBackend, MirrorError};

/// Mirror backend storing each key as `<data_dir>/<key>.json`.
///
/// Keys come from [`super::keys`] and only contain `[a-z0-9_]`, so they map
/// to file names directly.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Storage` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, MirrorError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory this backend writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl MirrorBackend for FileBackend {
    fn load_raw(&self, key: &str) -> Result<Option<String>, MirrorError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MirrorError::Storage(e)),
        }
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), MirrorError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), MirrorError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MirrorError::Storage(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let backend = FileBackend::new(dir.path()).unwrap();
            backend.save_raw("cart", r#"[{"quantity":2}]"#).unwrap();
        }

        // A fresh backend over the same directory sees the value
        let backend = FileBackend::new(dir.path()).unwrap();
        let raw = backend.load_raw("cart").unwrap();
        assert_eq!(raw.as_deref(), Some(r#"[{"quantity":2}]"#));
    }

    #[test]
    fn test_load_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();
        assert!(backend.load_raw("nothing").unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        backend.save_raw("theme", r#""light""#).unwrap();
        backend.save_raw("theme", r#""dark""#).unwrap();

        assert_eq!(
            backend.load_raw("theme").unwrap().as_deref(),
            Some(r#""dark""#)
        );
    }

    #[test]
    fn test_remove_then_load_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        backend.save_raw("session", "{}").unwrap();
        backend.remove("session").unwrap();
        backend.remove("session").unwrap(); // second remove is a no-op

        assert!(backend.load_raw("session").unwrap().is_none());
    }
}

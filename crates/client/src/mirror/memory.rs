//! In-memory mirror storage for tests.

use std::collections::HashMap;
use std::io;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sync;

use super::{MirrorBackend, MirrorError};

/// Mirror backend holding entries in a process-local map.
///
/// Used by tests and previews. `fail_writes` simulates a full device so
/// write-through error handling can be exercised.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `save_raw` calls fail, as a storage-quota stand-in.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        sync::read(&self.entries).len()
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MirrorBackend for MemoryBackend {
    fn load_raw(&self, key: &str) -> Result<Option<String>, MirrorError> {
        Ok(sync::read(&self.entries).get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), MirrorError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(MirrorError::Storage(io::Error::new(
                io::ErrorKind::StorageFull,
                "mirror writes disabled",
            )));
        }
        sync::write(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), MirrorError> {
        sync::write(&self.entries).remove(key);
        Ok(())
    }
}

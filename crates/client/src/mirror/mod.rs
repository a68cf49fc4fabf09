//! Persistent key-value mirror for client state.
//!
//! Containers keep their value in memory and write it through here after
//! every mutation. The mirror is a passive, best-effort sink: values are
//! JSON under stable string keys, there are no transactions and no schema
//! versioning, and a corrupt entry is reported as absent rather than as an
//! error so a bad disk state can never take the app down.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Mirror keys.
///
/// These are part of the on-device data contract and must stay stable
/// across releases.
pub mod keys {
    use caju_core::UserId;

    /// Authenticated session: `{token, user}` JSON.
    pub const SESSION: &str = "session";

    /// Cart lines: array of `{product, quantity}` JSON.
    pub const CART: &str = "cart";

    /// Whether the navigation sidebar is collapsed.
    pub const SIDEBAR_COLLAPSED: &str = "sidebar_collapsed";

    /// Theme preference: `"light"` or `"dark"`.
    pub const THEME: &str = "theme";

    /// Address handoff between the checkout address and payment steps.
    pub const CHECKOUT_ADDRESS: &str = "checkout_address";

    /// Per-user favorites key.
    #[must_use]
    pub fn favorites(user_id: UserId) -> String {
        format!("favorites_{user_id}")
    }
}

/// Errors from the mirror's storage layer.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The backing storage failed (missing directory, quota, permissions).
    #[error("mirror storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The value could not be serialized to JSON.
    #[error("mirror serialize error for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a typed load.
///
/// `Corrupt` is only interesting to the session container, which self-clears
/// on it; every other caller folds it into `Absent`.
#[derive(Debug)]
pub enum Loaded<T> {
    /// A well-formed value was found under the key.
    Value(T),
    /// No entry exists under the key.
    Absent,
    /// An entry exists but could not be deserialized.
    Corrupt,
}

impl<T> Loaded<T> {
    /// Fold into an `Option`, treating corrupt data as absent.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Corrupt => None,
        }
    }
}

/// Raw string storage the mirror is layered over.
///
/// Implementations only move strings; JSON encoding and corrupt-data
/// handling live in [`MirrorStore`].
pub trait MirrorBackend: Send + Sync {
    /// Read the raw string stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Storage` if the backing storage fails.
    fn load_raw(&self, key: &str) -> Result<Option<String>, MirrorError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Storage` if the backing storage fails.
    fn save_raw(&self, key: &str, value: &str) -> Result<(), MirrorError>;

    /// Delete the entry under `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Storage` if the backing storage fails.
    fn remove(&self, key: &str) -> Result<(), MirrorError>;
}

/// Typed JSON view over a [`MirrorBackend`].
///
/// Cheaply cloneable; all containers of one [`crate::StoreContext`] share
/// the same store.
#[derive(Clone)]
pub struct MirrorStore {
    backend: Arc<dyn MirrorBackend>,
}

impl MirrorStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn MirrorBackend>) -> Self {
        Self { backend }
    }

    /// Create a store over a fresh in-memory backend (tests, previews).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Load and deserialize the value under `key`.
    ///
    /// Storage failures and corrupt entries are logged and reported as
    /// [`Loaded::Corrupt`] / [`Loaded::Absent`]; they never propagate.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Loaded<T> {
        let raw = match self.backend.load_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Absent,
            Err(e) => {
                tracing::warn!("Failed to read mirror key {key}: {e}");
                return Loaded::Absent;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Loaded::Value(value),
            Err(e) => {
                tracing::warn!("Corrupt mirror entry under key {key}: {e}");
                Loaded::Corrupt
            }
        }
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError` if serialization or storage fails. Containers
    /// catch and log this; in-memory state stays authoritative.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), MirrorError> {
        let raw = serde_json::to_string(value).map_err(|source| MirrorError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.save_raw(key, &raw)
    }

    /// Delete the entry under `key`.
    ///
    /// # Errors
    ///
    /// Returns `MirrorError::Storage` if the backing storage fails.
    pub fn remove(&self, key: &str) -> Result<(), MirrorError> {
        self.backend.remove(key)
    }
}

//! UI preference container: theme and sidebar state.
//!
//! Two small mirrored values that outlive the session: the theme choice and
//! whether the navigation sidebar is collapsed. Each is mirrored under its
//! own key so either can be reset independently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::mirror::{MirrorStore, keys};
use crate::sync;

/// Theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// The UI preferences container.
///
/// Cheaply cloneable handle; all clones share the same state.
#[derive(Clone)]
pub struct PrefsContainer {
    inner: Arc<PrefsInner>,
}

struct PrefsInner {
    theme: RwLock<Theme>,
    sidebar_collapsed: RwLock<bool>,
    revision: AtomicU64,
    mirror: MirrorStore,
}

impl PrefsContainer {
    /// Load preferences from the mirror, defaulting to a light theme and an
    /// expanded sidebar.
    #[must_use]
    pub fn load(mirror: MirrorStore) -> Self {
        let theme = mirror.load(keys::THEME).into_option().unwrap_or_default();
        let sidebar_collapsed = mirror
            .load(keys::SIDEBAR_COLLAPSED)
            .into_option()
            .unwrap_or(false);

        Self {
            inner: Arc::new(PrefsInner {
                theme: RwLock::new(theme),
                sidebar_collapsed: RwLock::new(sidebar_collapsed),
                revision: AtomicU64::new(0),
                mirror,
            }),
        }
    }

    /// Current theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        *sync::read(&self.inner.theme)
    }

    /// Whether the dark theme is active.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme() == Theme::Dark
    }

    /// Set the theme and persist it.
    pub fn set_theme(&self, theme: Theme) {
        *sync::write(&self.inner.theme) = theme;
        self.bump();
        if let Err(e) = self.inner.mirror.save(keys::THEME, &theme) {
            tracing::warn!("Failed to mirror theme preference: {e}");
        }
    }

    /// Flip between light and dark.
    pub fn toggle_theme(&self) {
        self.set_theme(self.theme().toggled());
    }

    /// Whether the sidebar is collapsed.
    #[must_use]
    pub fn sidebar_collapsed(&self) -> bool {
        *sync::read(&self.inner.sidebar_collapsed)
    }

    /// Set the sidebar state and persist it.
    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        *sync::write(&self.inner.sidebar_collapsed) = collapsed;
        self.bump();
        if let Err(e) = self.inner.mirror.save(keys::SIDEBAR_COLLAPSED, &collapsed) {
            tracing::warn!("Failed to mirror sidebar preference: {e}");
        }
    }

    /// Flip the sidebar state.
    pub fn toggle_sidebar(&self) {
        self.set_sidebar_collapsed(!self.sidebar_collapsed());
    }

    /// Monotonic counter bumped on every mutation; views re-render when it
    /// changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.inner.revision.fetch_add(1, Ordering::Relaxed);
    }
}

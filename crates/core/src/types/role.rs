//! User roles.

use serde::{Deserialize, Serialize};

/// Role attached to a user profile.
///
/// The backend issues roles as uppercase strings; `Admin` unlocks the
/// management panel routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    /// Whether this role grants access to the management panel.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

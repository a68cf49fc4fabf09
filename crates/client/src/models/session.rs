//! Authenticated session model.

use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Token and profile of the logged-in user.
///
/// The two always travel together: the session container holds
/// `Option<SessionData>`, so a token can never exist without its user or
/// the other way around, in memory or in the mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    /// Opaque bearer token issued by the auth service.
    pub token: String,
    /// Profile returned alongside the token.
    pub user: UserProfile,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_shape() {
        let session: SessionData = serde_json::from_str(
            r#"{"token":"abc.def.ghi","user":{"id":1,"name":"Ana","email":"ana@example.com"}}"#,
        )
        .unwrap();
        assert_eq!(session.token, "abc.def.ghi");
        assert_eq!(session.user.name, "Ana");
    }

    #[test]
    fn test_token_without_user_is_rejected() {
        // A half-written entry must parse as corrupt, not as a session
        let result = serde_json::from_str::<SessionData>(r#"{"token":"abc"}"#);
        assert!(result.is_err());
    }
}

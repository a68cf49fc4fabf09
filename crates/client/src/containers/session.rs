//! Authentication session container.
//!
//! Holds `Option<SessionData>`: token and profile together or nothing.
//! Login and signup delegate to the auth collaborator and only touch state
//! on success; logout is always locally immediate, clearing memory, the
//! mirror entry, and the shared token cell regardless of any in-flight
//! network call. Corrupt mirrored identity data self-clears at load rather
//! than being partially trusted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use secrecy::SecretString;

use caju_core::{UserId, UserRole};

use crate::api::auth::{AuthApi, SignupRequest};
use crate::api::users::UsersApi;
use crate::api::{ApiError, TokenCell};
use crate::mirror::{Loaded, MirrorStore, keys};
use crate::models::{SessionData, UserProfile};
use crate::sync;

/// The session state container.
///
/// Cheaply cloneable handle; all clones share the same state.
#[derive(Clone)]
pub struct SessionContainer {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    session: RwLock<Option<SessionData>>,
    revision: AtomicU64,
    mirror: MirrorStore,
    token_cell: TokenCell,
}

impl SessionContainer {
    /// Load the session from the mirror.
    ///
    /// A corrupt entry is removed on the spot so later loads start clean,
    /// and the container comes up logged out.
    #[must_use]
    pub fn load(mirror: MirrorStore, token_cell: TokenCell) -> Self {
        let session = match mirror.load::<SessionData>(keys::SESSION) {
            Loaded::Value(session) => Some(session),
            Loaded::Absent => None,
            Loaded::Corrupt => {
                if let Err(e) = mirror.remove(keys::SESSION) {
                    tracing::warn!("Failed to clear corrupt session entry: {e}");
                }
                None
            }
        };

        token_cell.set(session.as_ref().map(|s| s.token.clone()));

        Self {
            inner: Arc::new(SessionInner {
                session: RwLock::new(session),
                revision: AtomicU64::new(0),
                mirror,
                token_cell,
            }),
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On success the token and profile are installed together and
    /// persisted; on failure state is untouched and the error goes back to
    /// the caller for display.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the auth collaborator.
    pub async fn login<A: AuthApi>(
        &self,
        auth: &A,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, ApiError> {
        let session = auth.login(email, password).await?;
        Ok(self.install(session))
    }

    /// Create an account and log it in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the auth collaborator.
    pub async fn signup<A: AuthApi>(
        &self,
        auth: &A,
        request: &SignupRequest,
    ) -> Result<UserProfile, ApiError> {
        let session = auth.signup(request).await?;
        Ok(self.install(session))
    }

    /// Log out: clear memory, the token cell, and the mirror entry.
    pub fn logout(&self) {
        *sync::write(&self.inner.session) = None;
        self.inner.token_cell.set(None);
        self.inner.revision.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.inner.mirror.remove(keys::SESSION) {
            tracing::warn!("Failed to remove mirrored session: {e}");
        }
    }

    /// Replace the stored profile (after a profile edit), keeping the
    /// token. No-op when logged out.
    pub fn update_user(&self, user: UserProfile) {
        {
            let mut session = sync::write(&self.inner.session);
            let Some(session) = session.as_mut() else {
                return;
            };
            session.user = user;
        }
        self.inner.revision.fetch_add(1, Ordering::Relaxed);
        self.persist();
    }

    /// Re-fetch the profile from the backend and store it.
    ///
    /// No-op when logged out.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the fetch fails; the stored profile is left
    /// as it was.
    pub async fn refresh_user<U: UsersApi>(&self, users: &U) -> Result<(), ApiError> {
        let Some(id) = self.user_id() else {
            return Ok(());
        };
        let user = users.get_user(id).await?;
        self.update_user(user);
        Ok(())
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        sync::read(&self.inner.session).is_some()
    }

    /// The bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        sync::read(&self.inner.session)
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// Snapshot of the logged-in profile.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        sync::read(&self.inner.session)
            .as_ref()
            .map(|s| s.user.clone())
    }

    /// Id of the logged-in user.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        sync::read(&self.inner.session).as_ref().map(|s| s.user.id)
    }

    /// Whether the logged-in user carries `role`.
    #[must_use]
    pub fn has_role(&self, role: UserRole) -> bool {
        sync::read(&self.inner.session)
            .as_ref()
            .is_some_and(|s| s.user.role == role)
    }

    /// Monotonic counter bumped on every mutation; views re-render when it
    /// changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Relaxed)
    }

    fn install(&self, session: SessionData) -> UserProfile {
        let user = session.user.clone();
        self.inner.token_cell.set(Some(session.token.clone()));
        *sync::write(&self.inner.session) = Some(session);
        self.inner.revision.fetch_add(1, Ordering::Relaxed);
        self.persist();
        user
    }

    fn persist(&self) {
        let session = sync::read(&self.inner.session);
        if let Some(session) = session.as_ref()
            && let Err(e) = self.inner.mirror.save(keys::SESSION, session)
        {
            tracing::warn!("Failed to mirror session: {e}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct StubAuth {
        outcome: Result<SessionData, &'static str>,
    }

    impl AuthApi for StubAuth {
        async fn login(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<SessionData, ApiError> {
            self.outcome.clone().map_err(|message| ApiError::Rejected {
                status: 401,
                message: message.to_string(),
            })
        }

        async fn signup(&self, request: &SignupRequest) -> Result<SessionData, ApiError> {
            let mut session = self.outcome.clone().map_err(|message| ApiError::Rejected {
                status: 409,
                message: message.to_string(),
            })?;
            session.user.name = request.name.clone();
            Ok(session)
        }
    }

    fn session_data(token: &str, user_id: i64) -> SessionData {
        serde_json::from_str(&format!(
            r#"{{"token":"{token}","user":{{"id":{user_id},"name":"Ana","email":"ana@example.com"}}}}"#
        ))
        .unwrap()
    }

    fn accepting(token: &str) -> StubAuth {
        StubAuth {
            outcome: Ok(session_data(token, 1)),
        }
    }

    fn rejecting(message: &'static str) -> StubAuth {
        StubAuth {
            outcome: Err(message),
        }
    }

    #[tokio::test]
    async fn test_login_installs_token_and_user_together() {
        let mirror = MirrorStore::in_memory();
        let token_cell = TokenCell::new();
        let session = SessionContainer::load(mirror.clone(), token_cell.clone());

        let user = session
            .login(&accepting("tok-1"), "ana@example.com", &"pw".into())
            .await
            .unwrap();

        assert_eq!(user.name, "Ana");
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(token_cell.get().as_deref(), Some("tok-1"));

        // Mirrored pair survives a reload
        let reloaded = SessionContainer::load(mirror, TokenCell::new());
        assert_eq!(reloaded.token().as_deref(), Some("tok-1"));
        assert_eq!(reloaded.user_id(), Some(UserId::new(1)));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_untouched() {
        let session = SessionContainer::load(MirrorStore::in_memory(), TokenCell::new());

        let err = session
            .login(&rejecting("Credenciais inválidas"), "ana@example.com", &"pw".into())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Credenciais inválidas");
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_login_then_logout_leaves_mirror_absent() {
        let mirror = MirrorStore::in_memory();
        let token_cell = TokenCell::new();
        let session = SessionContainer::load(mirror.clone(), token_cell.clone());

        session
            .login(&accepting("tok-1"), "ana@example.com", &"pw".into())
            .await
            .unwrap();
        session.logout();

        assert!(!session.is_authenticated());
        assert!(token_cell.get().is_none());

        let reloaded = SessionContainer::load(mirror, TokenCell::new());
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_corrupt_mirror_self_clears() {
        let mirror = MirrorStore::in_memory();
        mirror.save(keys::SESSION, &"not a session").unwrap();

        let session = SessionContainer::load(mirror.clone(), TokenCell::new());
        assert!(!session.is_authenticated());

        // The corrupt entry was removed, not left for the next load
        assert!(matches!(
            mirror.load::<SessionData>(keys::SESSION),
            Loaded::Absent
        ));
    }

    #[test]
    fn test_load_seeds_token_cell() {
        let mirror = MirrorStore::in_memory();
        mirror.save(keys::SESSION, &session_data("tok-9", 3)).unwrap();

        let token_cell = TokenCell::new();
        let _session = SessionContainer::load(mirror, token_cell.clone());
        assert_eq!(token_cell.get().as_deref(), Some("tok-9"));
    }

    #[tokio::test]
    async fn test_update_user_keeps_token() {
        let session = SessionContainer::load(MirrorStore::in_memory(), TokenCell::new());
        session
            .login(&accepting("tok-1"), "ana@example.com", &"pw".into())
            .await
            .unwrap();

        let mut user = session.current_user().unwrap();
        user.name = "Ana Maria".to_string();
        session.update_user(user);

        assert_eq!(session.current_user().unwrap().name, "Ana Maria");
        assert_eq!(session.token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_update_user_when_logged_out_is_noop() {
        let session = SessionContainer::load(MirrorStore::in_memory(), TokenCell::new());
        let user = session_data("x", 5).user;
        session.update_user(user);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_refresh_user_replaces_profile() {
        struct StubUsers;

        impl UsersApi for StubUsers {
            async fn get_user(&self, id: UserId) -> Result<UserProfile, ApiError> {
                Ok(serde_json::from_str(&format!(
                    r#"{{"id":{id},"name":"Ana Atualizada","email":"ana@example.com"}}"#
                ))
                .unwrap())
            }
        }

        let session = SessionContainer::load(MirrorStore::in_memory(), TokenCell::new());
        session
            .login(&accepting("tok-1"), "ana@example.com", &"pw".into())
            .await
            .unwrap();

        session.refresh_user(&StubUsers).await.unwrap();
        assert_eq!(session.current_user().unwrap().name, "Ana Atualizada");
    }
}

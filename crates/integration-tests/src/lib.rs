//! Integration tests for Caju Commerce.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p caju-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart invariants and mirror durability
//! - `session_favorites` - Login/logout lifecycle and per-user favorites
//! - `checkout_flow` - Wizard transitions and order submission
//! - `store_scope` - Provider wiring and hook guards
//!
//! The harness drives the real containers over an in-memory mirror with
//! stub collaborators, so every scenario runs hermetically: no backend, no
//! disk, no network.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;

use caju_client::api::auth::AuthApi;
use caju_client::api::orders::OrderApi;
use caju_client::api::types::{Order, OrderRequest};
use caju_client::api::{ApiError, TokenCell};
use caju_client::containers::{CartContainer, FavoritesContainer, PrefsContainer, SessionContainer};
use caju_client::mirror::{MemoryBackend, MirrorStore};
use caju_client::models::SessionData;
use caju_core::UserId;

/// Install a fmt subscriber for debugging test runs, driven by `RUST_LOG`.
///
/// Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Auth collaborator stub: a fixed user table, any password accepted.
pub struct StubAuth {
    users: HashMap<String, (UserId, String)>,
}

impl StubAuth {
    /// Build a stub knowing the given `(email, id, name)` users.
    #[must_use]
    pub fn with_users(users: &[(&str, i64, &str)]) -> Self {
        Self {
            users: users
                .iter()
                .map(|(email, id, name)| {
                    (
                        (*email).to_string(),
                        (UserId::new(*id), (*name).to_string()),
                    )
                })
                .collect(),
        }
    }

    fn session_for(&self, email: &str) -> Result<SessionData, ApiError> {
        let (id, name) = self
            .users
            .get(email)
            .ok_or_else(|| ApiError::Rejected {
                status: 401,
                message: "invalid credentials".to_string(),
            })?
            .clone();

        let session = serde_json::json!({
            "token": format!("tok-{id}"),
            "user": {"id": id, "name": name, "email": email},
        });
        serde_json::from_value(session).map_err(|_| ApiError::Rejected {
            status: 500,
            message: "stub produced an invalid session".to_string(),
        })
    }
}

impl AuthApi for StubAuth {
    async fn login(&self, email: &str, _password: &SecretString) -> Result<SessionData, ApiError> {
        self.session_for(email)
    }

    async fn signup(
        &self,
        request: &caju_client::api::auth::SignupRequest,
    ) -> Result<SessionData, ApiError> {
        self.session_for(&request.email)
    }
}

/// Order collaborator stub.
pub struct StubOrders {
    outcome: Result<Order, String>,
}

impl StubOrders {
    /// A stub that accepts every order, echoing the submitted total.
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            outcome: Ok(order_fixture()),
        }
    }

    /// A stub that rejects every order with `message`.
    #[must_use]
    pub fn rejecting(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
        }
    }
}

impl OrderApi for StubOrders {
    async fn create_order(&self, _request: &OrderRequest) -> Result<Order, ApiError> {
        self.outcome
            .clone()
            .map_err(|message| ApiError::Rejected {
                status: 500,
                message,
            })
    }
}

fn order_fixture() -> Order {
    serde_json::from_value(serde_json::json!({
        "id": 1,
        "moment": "2026-03-01T10:00:00",
        "status": "WAITING_PAYMENT",
        "orderNumber": "CJ-000001",
        "total": "114.80",
    }))
    .expect("order fixture must decode")
}

/// Hermetic harness: real containers over a shared in-memory mirror.
pub struct TestContext {
    pub backend: Arc<MemoryBackend>,
    pub mirror: MirrorStore,
    pub token_cell: TokenCell,
    pub cart: CartContainer,
    pub favorites: FavoritesContainer,
    pub session: SessionContainer,
    pub prefs: PrefsContainer,
    pub auth: StubAuth,
}

impl TestContext {
    /// Fresh harness with an empty mirror and two known users.
    #[must_use]
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let mirror = MirrorStore::new(backend.clone());
        Self::over(backend, mirror)
    }

    /// Rebuild every container over the same mirror, as an app restart
    /// would.
    #[must_use]
    pub fn reopen(self) -> Self {
        Self::over(self.backend, self.mirror)
    }

    fn over(backend: Arc<MemoryBackend>, mirror: MirrorStore) -> Self {
        let token_cell = TokenCell::new();
        let session = SessionContainer::load(mirror.clone(), token_cell.clone());
        let favorites = FavoritesContainer::load(mirror.clone(), session.user_id());
        let cart = CartContainer::load(mirror.clone());
        let prefs = PrefsContainer::load(mirror.clone());

        Self {
            backend,
            mirror,
            token_cell,
            cart,
            favorites,
            session,
            prefs,
            auth: StubAuth::with_users(&[
                ("ana@example.com", 1, "Ana"),
                ("bia@example.com", 2, "Bia"),
            ]),
        }
    }

    /// Log `email` in through the stub and rescope favorites, the way the
    /// application context wires the two containers together.
    ///
    /// # Panics
    ///
    /// Panics when the stub rejects the email.
    pub async fn login(&self, email: &str) {
        let user = self
            .session
            .login(&self.auth, email, &SecretString::from("password"))
            .await
            .expect("stub login must succeed for known users");
        self.favorites.set_user(Some(user.id));
    }

    /// Log out and drop the favorites scope.
    pub fn logout(&self) {
        self.session.logout();
        self.favorites.set_user(None);
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

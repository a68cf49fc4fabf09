//! Provider context and consumer hooks.
//!
//! `StoreContext` is the application-wide service object: containers plus
//! collaborator clients, constructed once at startup and passed by
//! reference. `StoreScope` is what views receive; its hooks hand out the
//! containers and fail loudly when no context was provided, which is a
//! programmer error and not a recoverable condition.

use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;

use crate::api::auth::SignupRequest;
use crate::api::{
    ApiClient, ApiError, AuthClient, CategoriesClient, OrdersClient, ProductsClient, TokenCell,
    UsersClient,
};
use crate::config::ClientConfig;
use crate::containers::{CartContainer, FavoritesContainer, PrefsContainer, SessionContainer};
use crate::mirror::{FileBackend, MirrorError, MirrorStore};
use crate::models::UserProfile;

/// Error building the application context.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("mirror setup failed: {0}")]
    Mirror(#[from] MirrorError),
    #[error("api client setup failed: {0}")]
    Api(#[from] ApiError),
}

/// Raised (as a panic message) when a hook runs outside a provided scope.
#[derive(Debug, Error)]
#[error("{hook}() hook used outside an active StoreScope; provide a StoreContext first")]
pub struct MissingProviderError {
    hook: &'static str,
}

/// Application-wide state and services.
pub struct StoreContext {
    config: ClientConfig,
    mirror: MirrorStore,
    cart: CartContainer,
    favorites: FavoritesContainer,
    session: SessionContainer,
    prefs: PrefsContainer,
    auth: AuthClient,
    products: ProductsClient,
    categories: CategoriesClient,
    orders: OrdersClient,
    users: UsersClient,
}

impl StoreContext {
    /// Build the context with a file mirror under the configured data
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if the data directory or HTTP client cannot
    /// be set up.
    pub fn new(config: ClientConfig) -> Result<Arc<Self>, ContextError> {
        let backend = FileBackend::new(config.data_dir.clone())?;
        Self::with_mirror(config, MirrorStore::new(Arc::new(backend)))
    }

    /// Build the context over an explicit mirror (tests, previews).
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if the HTTP client cannot be set up.
    pub fn with_mirror(
        config: ClientConfig,
        mirror: MirrorStore,
    ) -> Result<Arc<Self>, ContextError> {
        let token_cell = TokenCell::new();
        let session = SessionContainer::load(mirror.clone(), token_cell.clone());
        let favorites = FavoritesContainer::load(mirror.clone(), session.user_id());
        let cart = CartContainer::load(mirror.clone());
        let prefs = PrefsContainer::load(mirror.clone());

        let api = ApiClient::new(&config, token_cell)?;

        Ok(Arc::new(Self {
            config,
            mirror,
            cart,
            favorites,
            session,
            prefs,
            auth: AuthClient::new(api.clone()),
            products: ProductsClient::new(api.clone()),
            categories: CategoriesClient::new(api.clone()),
            orders: OrdersClient::new(api.clone()),
            users: UsersClient::new(api),
        }))
    }

    /// Log in and rescope favorites to the new user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the auth service; all state is untouched on
    /// failure.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, ApiError> {
        let user = self.session.login(&self.auth, email, password).await?;
        self.favorites.set_user(Some(user.id));
        Ok(user)
    }

    /// Sign up, log in, and rescope favorites to the new user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the auth service; all state is untouched on
    /// failure.
    pub async fn signup(&self, request: &SignupRequest) -> Result<UserProfile, ApiError> {
        let user = self.session.signup(&self.auth, request).await?;
        self.favorites.set_user(Some(user.id));
        Ok(user)
    }

    /// Log out locally and drop the favorites scope.
    pub fn logout(&self) {
        self.session.logout();
        self.favorites.set_user(None);
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The mirror all containers write through.
    #[must_use]
    pub const fn mirror(&self) -> &MirrorStore {
        &self.mirror
    }

    /// The cart container.
    #[must_use]
    pub const fn cart(&self) -> &CartContainer {
        &self.cart
    }

    /// The favorites container.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesContainer {
        &self.favorites
    }

    /// The session container.
    #[must_use]
    pub const fn session(&self) -> &SessionContainer {
        &self.session
    }

    /// The UI preferences container.
    #[must_use]
    pub const fn prefs(&self) -> &PrefsContainer {
        &self.prefs
    }

    /// The auth service client.
    #[must_use]
    pub const fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// The products client.
    #[must_use]
    pub const fn products(&self) -> &ProductsClient {
        &self.products
    }

    /// The categories client.
    #[must_use]
    pub const fn categories(&self) -> &CategoriesClient {
        &self.categories
    }

    /// The orders client.
    #[must_use]
    pub const fn orders(&self) -> &OrdersClient {
        &self.orders
    }

    /// The users client.
    #[must_use]
    pub const fn users(&self) -> &UsersClient {
        &self.users
    }
}

/// Provider handle passed to views.
///
/// Starts empty; hooks panic until a context is provided. Resettable so
/// tests can simulate provider teardown.
#[derive(Clone, Default)]
pub struct StoreScope {
    context: Option<Arc<StoreContext>>,
}

impl StoreScope {
    /// A scope with no provider; every hook panics.
    #[must_use]
    pub const fn empty() -> Self {
        Self { context: None }
    }

    /// A scope over a provided context.
    #[must_use]
    pub const fn provide(context: Arc<StoreContext>) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// Tear the provider down; subsequent hook calls panic again.
    pub fn reset(&mut self) {
        self.context = None;
    }

    /// Whether a context is provided.
    #[must_use]
    pub const fn is_provided(&self) -> bool {
        self.context.is_some()
    }

    /// The full context.
    ///
    /// # Panics
    ///
    /// Panics with [`MissingProviderError`] outside a provided scope.
    #[must_use]
    pub fn context(&self) -> &Arc<StoreContext> {
        self.expect("context")
    }

    /// Cart hook.
    ///
    /// # Panics
    ///
    /// Panics with [`MissingProviderError`] outside a provided scope.
    #[must_use]
    pub fn cart(&self) -> &CartContainer {
        self.expect("cart").cart()
    }

    /// Favorites hook.
    ///
    /// # Panics
    ///
    /// Panics with [`MissingProviderError`] outside a provided scope.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesContainer {
        self.expect("favorites").favorites()
    }

    /// Session hook.
    ///
    /// # Panics
    ///
    /// Panics with [`MissingProviderError`] outside a provided scope.
    #[must_use]
    pub fn session(&self) -> &SessionContainer {
        self.expect("session").session()
    }

    /// UI preferences hook.
    ///
    /// # Panics
    ///
    /// Panics with [`MissingProviderError`] outside a provided scope.
    #[must_use]
    pub fn prefs(&self) -> &PrefsContainer {
        self.expect("prefs").prefs()
    }

    fn expect(&self, hook: &'static str) -> &Arc<StoreContext> {
        self.context
            .as_ref()
            .unwrap_or_else(|| panic!("{}", MissingProviderError { hook }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            api_base_url: "http://localhost:8080/api/".parse().unwrap(),
            data_dir: std::path::PathBuf::from(".caju-test"),
            http_timeout: std::time::Duration::from_secs(5),
        }
    }

    fn provided_scope() -> StoreScope {
        let context = StoreContext::with_mirror(test_config(), MirrorStore::in_memory()).unwrap();
        StoreScope::provide(context)
    }

    #[test]
    fn test_hooks_reach_containers() {
        let scope = provided_scope();
        assert!(scope.cart().is_empty());
        assert!(!scope.session().is_authenticated());
        assert!(!scope.prefs().is_dark());
        assert_eq!(scope.favorites().count(), 0);
    }

    #[test]
    #[should_panic(expected = "cart() hook used outside an active StoreScope")]
    fn test_empty_scope_panics() {
        let scope = StoreScope::empty();
        let _ = scope.cart();
    }

    #[test]
    #[should_panic(expected = "session() hook used outside an active StoreScope")]
    fn test_reset_scope_panics_again() {
        let mut scope = provided_scope();
        scope.reset();
        let _ = scope.session();
    }

    #[test]
    fn test_scope_clones_share_context() {
        let scope = provided_scope();
        let clone = scope.clone();
        scope.cart().add(
            crate::models::ProductRef {
                id: caju_core::ProductId::new(1),
                name: "x".to_string(),
                price: caju_core::Price::from_cents(100),
                image_url: None,
            },
            1,
        );
        assert_eq!(clone.cart().total_items(), 1);
    }
}

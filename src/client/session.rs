//! Console session: who is signed in, and the credential slot behind it.
//!
//! The session is the only writer of the credential store. The transport
//! reports a rejected token as [`ClientError::Unauthorized`]; resource calls
//! can only be made through [`Session::request`], which reacts by signing out.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use super::error::{ClientError, Result};
use super::resources::RegistryClient;
use super::store::{CredentialStore, FileCredentialStore};
use super::transport::Transport;
use crate::access::{self, Action, Resource, RouteAccess};
use crate::config::Config;
use crate::models::user::{Role, User};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    /// A stored token is being checked against `/auth/me`.
    Restoring,
    /// A login request is in flight.
    LoggingIn,
    Authenticated,
}

/// A snapshot of the session, as observed by views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub token: Option<String>,
}

impl SessionState {
    fn unauthenticated() -> Self {
        Self::default()
    }

    fn with_phase(phase: SessionPhase) -> Self {
        Self {
            phase,
            ..Self::default()
        }
    }

    fn authenticated(user: User, token: String) -> Self {
        Self {
            phase: SessionPhase::Authenticated,
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated && self.token.is_some() && self.user.is_some()
    }

    /// Whether a restore or login is still in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Restoring | SessionPhase::LoggingIn)
    }

    /// The signed-in user's role, if authenticated.
    pub fn role(&self) -> Option<Role> {
        if self.is_authenticated() {
            self.user.as_ref().map(|user| user.role)
        } else {
            None
        }
    }
}

/// An authenticated console session against the registry API.
pub struct Session {
    client: RegistryClient,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Creates a new `Session`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The registry API root.
    /// * `store` - The credential slot shared with the transport.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Session`. The initial phase is `Restoring`
    /// when the store already holds a token, `Unauthenticated` otherwise.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        let transport = Transport::new(http, base_url, Arc::clone(&store))?;

        let initial = if store.get().is_some() {
            SessionState::with_phase(SessionPhase::Restoring)
        } else {
            SessionState::unauthenticated()
        };
        let (state, _) = watch::channel(initial);

        Ok(Self {
            client: RegistryClient::new(transport),
            store,
            state,
        })
    }

    /// Creates a session using the durable credential slot under `config.data_dir`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(&config.data_dir));
        Self::new(config.api_base_url.clone(), store)
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn publish(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    fn sign_out(&self) {
        self.store.clear();
        self.publish(SessionState::unauthenticated());
    }

    /// Revalidates a stored token.
    ///
    /// Without a token this settles on `Unauthenticated` without touching the
    /// network. A token the server no longer accepts is cleared.
    pub async fn restore(&self) -> SessionState {
        let Some(token) = self.store.get() else {
            self.publish(SessionState::unauthenticated());
            return self.state();
        };

        self.publish(SessionState::with_phase(SessionPhase::Restoring));
        tracing::debug!("🔄 Restoring session...");

        match self.client.auth().me().await {
            Ok(user) => {
                tracing::info!("✅ Session restored for {}", user.username);
                self.publish(SessionState::authenticated(user, token));
            }
            Err(e) => {
                tracing::warn!("❌ Stored session rejected: {}", e);
                self.sign_out();
            }
        }

        self.state()
    }

    /// Signs in with a username and password.
    ///
    /// # Returns
    ///
    /// A `Result` containing the signed-in `User`. If the login call fails or
    /// its response carries no token, the store and state are left as they
    /// were. If the profile fetch fails after the token was stored, the
    /// session is signed out.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let previous = self.state();
        self.publish(SessionState::with_phase(SessionPhase::LoggingIn));
        tracing::info!("🔐 Login attempt for: {}", username);

        let token = match self.client.auth().login(username, password).await {
            Ok(response) => response.into_token(),
            Err(e) => Err(e),
        };
        let token = match token {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("❌ Login failed for {}: {}", username, e);
                self.publish(previous);
                return Err(e);
            }
        };

        self.store.set(&token);

        match self.client.auth().me().await {
            Ok(user) => {
                tracing::info!("✅ Signed in as {} ({})", user.username, user.role);
                self.publish(SessionState::authenticated(user.clone(), token));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!("❌ Profile fetch failed after login: {}", e);
                self.sign_out();
                Err(e)
            }
        }
    }

    /// Signs out locally. No request is made.
    pub fn logout(&self) {
        tracing::info!("👋 Signing out");
        self.sign_out();
    }

    /// Runs a resource call, signing out if the server rejects the token.
    ///
    /// ```ignore
    /// let campuses = session.request(|api| api.campuses().list()).await?;
    /// ```
    pub async fn request<'a, F, Fut, T>(&'a self, call: F) -> Result<T>
    where
        F: FnOnce(&'a RegistryClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let result = call(&self.client).await;
        if let Err(ClientError::Unauthorized) = &result {
            tracing::warn!("❌ Token rejected, signing out");
            self.sign_out();
        }
        result
    }

    pub fn current_user(&self) -> Option<User> {
        let state = self.state.borrow();
        if state.is_authenticated() {
            state.user.clone()
        } else {
            None
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    /// Whether the signed-in user may perform `action` on `resource`.
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        self.role().is_some_and(|role| role.permits(resource, action))
    }

    /// Decides access to a protected view; see [`access::route_access`].
    pub fn route_access(&self, required: Option<(Resource, Action)>) -> RouteAccess {
        access::route_access(&self.state.borrow(), required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::store::MemoryCredentialStore;
    use crate::models::user::UserStatus;

    fn user(role: Role) -> User {
        User {
            id: "1".to_string(),
            full_name: "Ada Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@udata.edu".to_string(),
            status: UserStatus::Active,
            role,
        }
    }

    #[test]
    fn initial_phase_follows_the_store() {
        let empty = Session::new("http://localhost:1", Arc::new(MemoryCredentialStore::new())).unwrap();
        assert_eq!(empty.state().phase, SessionPhase::Unauthenticated);

        let stored = Session::new(
            "http://localhost:1",
            Arc::new(MemoryCredentialStore::with_token("abc")),
        )
        .unwrap();
        assert_eq!(stored.state().phase, SessionPhase::Restoring);
        assert_eq!(stored.route_access(None), RouteAccess::Pending);
    }

    #[test]
    fn logout_clears_store_and_state() {
        let store = Arc::new(MemoryCredentialStore::with_token("abc"));
        let session = Session::new("http://localhost:1", store.clone()).unwrap();
        session.publish(SessionState::authenticated(user(Role::Admin), "abc".to_string()));
        assert!(session.can(Resource::Campus, Action::Delete));

        session.logout();

        assert_eq!(store.get(), None);
        assert_eq!(session.state(), SessionState::default());
        assert_eq!(session.current_user(), None);
        assert!(!session.can(Resource::Campus, Action::View));
    }

    #[test]
    fn role_requires_a_complete_authenticated_state() {
        let partial = SessionState {
            phase: SessionPhase::Authenticated,
            user: Some(user(Role::Viewer)),
            token: None,
        };
        assert!(!partial.is_authenticated());
        assert_eq!(partial.role(), None);

        let full = SessionState::authenticated(user(Role::Viewer), "t".to_string());
        assert_eq!(full.role(), Some(Role::Viewer));
    }

    #[tokio::test]
    async fn restore_without_token_stays_unauthenticated() {
        let session = Session::new("http://localhost:1", Arc::new(MemoryCredentialStore::new())).unwrap();
        let mut rx = session.subscribe();

        let state = session.restore().await;

        assert_eq!(state.phase, SessionPhase::Unauthenticated);
        assert_eq!(rx.borrow_and_update().phase, SessionPhase::Unauthenticated);
    }
}

//! Auth session lifecycle.
//!
//! Single source of truth for "is there a valid session, for whom, with
//! what role". The manager validates by probing the profile endpoint; it
//! never infers a role from the credential's shape, and it never clears a
//! stored credential just because a probe failed - the server is the
//! authority on expiry.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use medtriage_common::{LoginRequest, Role};

use crate::api::ApiClient;
use crate::error::Result;
use crate::events::{AuthEvent, AuthEvents};
use crate::store::{AdminCredential, CredentialKind, CredentialStore};

/// Identity derived from a successful profile probe. Never persisted;
/// recomputed on every (re)validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
}

/// Session state machine.
///
/// `Unknown -> Validating -> Authenticated | Unauthenticated`. A role only
/// exists inside `Authenticated`, so "authenticated=false implies role is
/// undefined" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Validating,
    Authenticated(SessionIdentity),
    Unauthenticated,
}

impl SessionState {
    /// Whether validation has resolved. While unsettled the view must show
    /// a loading placeholder, never a redirect.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionState::Authenticated(_) | SessionState::Unauthenticated
        )
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// The landing view for this state: admins go to the dashboard,
    /// everyone else to the triage form, no session to the login view.
    pub fn home_route(&self) -> Route {
        match self.identity() {
            Some(identity) if identity.role.is_admin() => Route::AdminDashboard,
            Some(_) => Route::Triage,
            None => Route::Login,
        }
    }

    /// Role-based routing policy for a requested view.
    ///
    /// Unauthenticated always lands on login. An authenticated non-admin
    /// navigating to an admin-only view is sent to the triage view, not
    /// back to login. Requesting the login view while authenticated goes
    /// home. Only meaningful once [`SessionState::is_settled`] is true.
    pub fn resolve_route(&self, requested: Route) -> Route {
        let identity = match self.identity() {
            Some(identity) => identity,
            None => return Route::Login,
        };
        match requested {
            Route::Login => self.home_route(),
            Route::AdminDashboard if !identity.role.is_admin() => Route::Triage,
            other => other,
        }
    }
}

/// Views the surrounding shell can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Triage,
    AdminDashboard,
}

/// Owns the session state, the credential store, and the auth event
/// channel. Every consuming view shares one instance.
pub struct SessionManager {
    api: Arc<ApiClient>,
    store: Arc<dyn CredentialStore>,
    events: AuthEvents,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            store,
            events: AuthEvents::new(),
            state: RwLock::new(SessionState::Unknown),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Validate the stored credential against the profile endpoint.
    ///
    /// With no stored credential this resolves to `Unauthenticated`
    /// directly, without issuing any network request. A failed probe also
    /// resolves to `Unauthenticated` but leaves credentials in place.
    pub async fn validate(&self) -> SessionState {
        let token = match self.store.get(CredentialKind::User) {
            Some(token) => token,
            None => {
                let state = SessionState::Unauthenticated;
                *self.state.write().await = state.clone();
                return state;
            }
        };

        *self.state.write().await = SessionState::Validating;

        let state = match self.api.profile(&token).await {
            Ok(profile) => {
                tracing::debug!("Profile probe succeeded for {}", profile.username);
                SessionState::Authenticated(SessionIdentity {
                    username: profile.username,
                    email: profile.email,
                    role: profile.role,
                })
            }
            Err(err) => {
                tracing::debug!("Profile probe failed: {}", err);
                SessionState::Unauthenticated
            }
        };
        *self.state.write().await = state.clone();
        state
    }

    /// Exchange credentials for a token, persist it, and resolve identity.
    ///
    /// On an admin profile the token is additionally stored under the
    /// admin key in its `Bearer <jwt>` form, so admin requests attach it
    /// as an `Authorization` header. Publishes an auth-change event after
    /// the token is stored.
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<SessionIdentity> {
        let request = LoginRequest {
            username_or_email: username_or_email.to_string(),
            password: password.to_string(),
        };
        let token = self.api.login(&request).await?;

        self.store
            .set(CredentialKind::User, &token.access_token);
        self.events.publish(AuthEvent::Changed);

        let profile = match self.api.profile(&token.access_token).await {
            Ok(profile) => profile,
            Err(err) => {
                // Token stored but identity unresolved; the caller surfaces
                // the error and a later validate() will probe again.
                *self.state.write().await = SessionState::Unauthenticated;
                return Err(err);
            }
        };

        if profile.role.is_admin() {
            let stored = AdminCredential::Bearer(token.access_token.clone()).to_stored();
            self.store.set(CredentialKind::Admin, &stored);
        }

        let identity = SessionIdentity {
            username: profile.username,
            email: profile.email,
            role: profile.role,
        };
        *self.state.write().await = SessionState::Authenticated(identity.clone());
        tracing::info!("Logged in as {} ({:?})", identity.username, identity.role);
        Ok(identity)
    }

    /// Clear both credential kinds and notify subscribers.
    pub async fn logout(&self) {
        self.store.clear(CredentialKind::User);
        self.store.clear(CredentialKind::Admin);
        *self.state.write().await = SessionState::Unauthenticated;
        self.events.publish(AuthEvent::Changed);
        tracing::info!("Logged out");
    }

    /// Re-validate on every auth event until the channel closes.
    ///
    /// Shells spawn this once at mount; lagged receivers skip missed
    /// events and keep going, since any event only ever means "validate
    /// again".
    pub async fn watch(&self, mut receiver: broadcast::Receiver<AuthEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::debug!("Auth event received: {:?}", event);
                    self.validate().await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Auth event receiver lagged, skipped {}", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }
}

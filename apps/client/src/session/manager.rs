//! Session manager: the single source of truth for who is logged in.
//!
//! Built once per process and handed to whatever needs it. The same
//! `SessionSlot` backs both the manager and the `ApiClient` it owns, so a 401
//! seen on any request ends the session the manager reports.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api_client::{ApiClient, SessionExpiryGuard};
use crate::config::Config;
use crate::endpoints::auth;
use crate::errors::{ApiError, AuthError};
use crate::navigation::{Navigator, LOGIN_ROUTE};
use crate::session::state::{ConfirmResult, SessionSlot};
use crate::session::storage::SessionStore;
use crate::session::types::{
    AuthResponse, Credentials, Registration, Role, SessionPhase, User,
};

/// What `initialize` found in storage.
pub enum Rehydration {
    Anonymous,
    /// The cached user is exposed right away; `verification` settles whether
    /// the backend still accepts the token.
    Tentative {
        user: User,
        verification: Verification,
    },
}

/// Final state of a background re-validation.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// The backend accepted the token; the refreshed record is now current.
    Confirmed(User),
    /// The backend rejected the token; the session has been cleared.
    Invalidated,
    /// The backend could not be reached; the session stays tentative.
    Unverified,
    /// The session was logged out or replaced before the answer arrived.
    Superseded,
}

/// Handle on the background re-validation. Dropping it does not cancel it.
pub struct Verification {
    handle: JoinHandle<VerifyOutcome>,
}

impl Verification {
    pub async fn outcome(self) -> VerifyOutcome {
        self.handle.await.unwrap_or_else(|e| {
            warn!("Session verification task failed: {e}");
            VerifyOutcome::Unverified
        })
    }
}

#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
    slot: Arc<SessionSlot>,
    navigator: Arc<dyn Navigator>,
}

impl SessionManager {
    /// Wires storage, transport and the 401 policy together.
    pub fn new(
        config: &Config,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let slot = Arc::new(SessionSlot::new(store));
        let guard = SessionExpiryGuard::clear_and_redirect(slot.clone(), navigator.clone());
        let api = ApiClient::new(&config.api_url, config.http_timeout, slot.clone())?
            .with_interceptor(Arc::new(guard));

        Ok(Self {
            api,
            slot,
            navigator,
        })
    }

    /// Client for every other backend call; shares this session.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Reads the persisted session and, if it is usable, exposes it as
    /// tentative while the backend is asked to confirm it in the background.
    /// Must be called from within a tokio runtime.
    pub async fn initialize(&self) -> Rehydration {
        let Some((generation, token, user)) = self.slot.rehydrate() else {
            info!("No persisted session");
            return Rehydration::Anonymous;
        };
        info!("Restored session for {} ({}), verifying", user.email, user.role);

        let manager = self.clone();
        let handle = tokio::spawn(async move { manager.verify(generation, token).await });

        Rehydration::Tentative {
            user,
            verification: Verification { handle },
        }
    }

    async fn verify(&self, generation: u64, token: String) -> VerifyOutcome {
        match auth::me(&self.api).await {
            Ok(user) => match self.slot.confirm(generation, &token, user.clone()) {
                ConfirmResult::Applied => {
                    info!("Session confirmed for {}", user.email);
                    VerifyOutcome::Confirmed(user)
                }
                ConfirmResult::Superseded => {
                    debug!("Session changed during verification, dropping result");
                    VerifyOutcome::Superseded
                }
                ConfirmResult::RoleChanged => {
                    warn!("Backend reports a different role, ending session");
                    if self.slot.invalidate(generation) {
                        VerifyOutcome::Invalidated
                    } else {
                        VerifyOutcome::Superseded
                    }
                }
            },
            // The expiry guard has already cleared the session.
            Err(ApiError::Unauthorized { .. }) => {
                if self.slot.expired_at(generation) {
                    VerifyOutcome::Invalidated
                } else {
                    VerifyOutcome::Superseded
                }
            }
            Err(e) if e.is_transport() => {
                warn!("Could not verify session, keeping it unverified: {e}");
                if self.slot.generation() == generation {
                    VerifyOutcome::Unverified
                } else {
                    VerifyOutcome::Superseded
                }
            }
            Err(e) => {
                warn!("Session verification failed, ending session: {e}");
                if self.slot.invalidate(generation) {
                    VerifyOutcome::Invalidated
                } else {
                    VerifyOutcome::Superseded
                }
            }
        }
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let response = auth::register(&self.api, registration)
            .await
            .map_err(|e| {
                warn!("Registration failed: {e}");
                AuthError::from_api(&e, "Registration failed")
            })?;
        self.open_session(response)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let response = auth::login(&self.api, credentials).await.map_err(|e| {
            warn!("Login failed: {e}");
            AuthError::from_api(&e, "Login failed")
        })?;
        self.open_session(response)
    }

    fn open_session(&self, response: AuthResponse) -> Result<User, AuthError> {
        let AuthResponse { token, user } = response;
        self.slot
            .establish(&token, &user)
            .map_err(|e| AuthError::storage(&e))?;
        info!("Signed in as {} ({})", user.email, user.role);
        Ok(user)
    }

    /// Tells the backend (best effort), then always clears the session and
    /// returns to the login screen.
    pub async fn logout(&self) {
        if let Err(e) = auth::logout(&self.api).await {
            warn!("Logout request failed: {e}");
        }
        self.slot.clear();
        info!("Signed out");
        self.navigator.redirect(LOGIN_ROUTE);
    }

    /// True iff a non-expired token is stored. An expired one is cleared.
    pub fn is_authenticated(&self) -> bool {
        self.slot.check_authenticated()
    }

    /// Role of the current session, read from the persisted user record when
    /// `initialize` has not run in this process.
    pub fn get_role(&self) -> Option<Role> {
        self.slot.current_user().map(|u| u.role)
    }

    pub fn current_user(&self) -> Option<User> {
        self.slot.current_user()
    }

    pub fn phase(&self) -> SessionPhase {
        self.slot.phase()
    }
}

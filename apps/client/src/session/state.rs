use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::session::lock;
use crate::session::storage::{SessionStore, TOKEN_KEY, USER_KEY};
use crate::session::token;
use crate::session::types::{SessionPhase, User};

struct Inner {
    user: Option<User>,
    phase: SessionPhase,
    /// Bumped on every establish, rehydrate and clear. A re-validation only
    /// lands if the generation it captured is still current.
    generation: u64,
    /// Generation that was current when a 401 last ended the session.
    expired_generation: Option<u64>,
}

/// Result of applying a backend-confirmed user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    Applied,
    /// The session was cleared or replaced while the check was in flight.
    Superseded,
    /// The backend reports a different role than the session was opened with.
    RoleChanged,
}

/// The token/user pair shared by the session manager and the request layer.
///
/// Every read-modify-write of the pair happens under one lock with no await
/// inside, so login, logout, 401 handling and rehydration never interleave
/// their writes.
pub struct SessionSlot {
    store: Arc<dyn SessionStore>,
    inner: Mutex<Inner>,
}

impl SessionSlot {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            inner: Mutex::new(Inner {
                user: None,
                phase: SessionPhase::Anonymous,
                generation: 0,
                expired_generation: None,
            }),
        }
    }

    /// Raw token as persisted, expired or not.
    pub fn stored_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    /// Persisted token, if present and usable. Never mutates storage.
    pub fn live_token(&self) -> Option<String> {
        self.stored_token().filter(|t| token::is_usable(t))
    }

    /// Persisted user record. An unreadable record reads as absent.
    pub fn stored_user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Stored user record is unreadable: {e}");
                None
            }
        }
    }

    /// In-memory user only; empty until the session is established or rehydrated.
    pub fn user(&self) -> Option<User> {
        lock(&self.inner).user.clone()
    }

    /// The in-memory user, or else the persisted one while a usable token is
    /// stored alongside it.
    pub fn current_user(&self) -> Option<User> {
        let inner = lock(&self.inner);
        if let Some(user) = &inner.user {
            return Some(user.clone());
        }
        self.live_token()?;
        self.stored_user()
    }

    pub fn phase(&self) -> SessionPhase {
        lock(&self.inner).phase
    }

    pub fn generation(&self) -> u64 {
        lock(&self.inner).generation
    }

    /// Persists a session issued by the backend and exposes it as confirmed.
    /// On a storage failure nothing changes.
    pub fn establish(&self, token: &str, user: &User) -> Result<u64, StoreError> {
        let user_json = serde_json::to_string(user)?;

        let mut inner = lock(&self.inner);
        self.store
            .set_many(&[(TOKEN_KEY, token), (USER_KEY, user_json.as_str())])?;
        inner.user = Some(user.clone());
        inner.phase = SessionPhase::Confirmed;
        inner.generation += 1;
        Ok(inner.generation)
    }

    /// Exposes the persisted session as tentative. Returns the generation and
    /// token the caller must present to `confirm`, or `None` when there is no
    /// usable session (an expired, undecodable or half-written one is cleared).
    pub fn rehydrate(&self) -> Option<(u64, String, User)> {
        let mut inner = lock(&self.inner);

        let token = self.store.get(TOKEN_KEY)?;
        if !token::is_usable(&token) {
            debug!("Persisted token is expired or malformed, clearing session");
            self.clear_locked(&mut inner);
            return None;
        }
        let Some(user) = self.stored_user() else {
            warn!("Persisted token has no user record, clearing session");
            self.clear_locked(&mut inner);
            return None;
        };

        inner.user = Some(user.clone());
        inner.phase = SessionPhase::Tentative;
        inner.generation += 1;
        Some((inner.generation, token, user))
    }

    /// Applies a user record returned by the backend for the session that was
    /// current at `generation`.
    pub fn confirm(&self, generation: u64, token: &str, user: User) -> ConfirmResult {
        let mut inner = lock(&self.inner);

        if inner.generation != generation
            || self.store.get(TOKEN_KEY).as_deref() != Some(token)
        {
            return ConfirmResult::Superseded;
        }
        if let Some(current) = &inner.user {
            if current.role != user.role {
                return ConfirmResult::RoleChanged;
            }
        }

        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.store.set(USER_KEY, &json) {
                    warn!("Could not persist refreshed user record: {e}");
                }
            }
            Err(e) => warn!("Could not serialize refreshed user record: {e}"),
        }
        inner.user = Some(user);
        inner.phase = SessionPhase::Confirmed;
        ConfirmResult::Applied
    }

    /// Clears the session only if it is still the one from `generation`.
    pub fn invalidate(&self, generation: u64) -> bool {
        let mut inner = lock(&self.inner);
        if inner.generation != generation {
            return false;
        }
        self.clear_locked(&mut inner);
        true
    }

    /// Unconditionally clears persisted and in-memory state.
    pub fn clear(&self) {
        let mut inner = lock(&self.inner);
        self.clear_locked(&mut inner);
    }

    /// Clears the session because the backend refused its token.
    pub fn expire(&self) {
        let mut inner = lock(&self.inner);
        let generation = inner.generation;
        self.clear_locked(&mut inner);
        inner.expired_generation = Some(generation);
    }

    /// True if a 401 ended the session that was current at `generation`.
    pub fn expired_at(&self, generation: u64) -> bool {
        lock(&self.inner).expired_generation == Some(generation)
    }

    /// True iff a persisted token exists and is usable. An expired or
    /// malformed token is cleared as a side effect; a live one leaves storage
    /// untouched.
    pub fn check_authenticated(&self) -> bool {
        let mut inner = lock(&self.inner);
        match self.store.get(TOKEN_KEY) {
            None => {
                if inner.user.is_some() {
                    self.clear_locked(&mut inner);
                }
                false
            }
            Some(token) if !token::is_usable(&token) => {
                debug!("Token expired or malformed, clearing session");
                self.clear_locked(&mut inner);
                false
            }
            Some(_) => true,
        }
    }

    fn clear_locked(&self, inner: &mut Inner) {
        if let Err(e) = self.store.remove_many(&[TOKEN_KEY, USER_KEY]) {
            warn!("Could not remove persisted session: {e}");
        }
        inner.user = None;
        inner.phase = SessionPhase::Anonymous;
        inner.generation += 1;
    }
}

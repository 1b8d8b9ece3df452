pub mod manager;
pub mod state;
pub mod storage;
pub mod token;
pub mod types;

use std::sync::{Mutex, MutexGuard};

pub use manager::{Rehydration, SessionManager, Verification, VerifyOutcome};
pub use state::SessionSlot;
pub use storage::{FileStore, MemoryStore, SessionStore};
pub use types::{Credentials, Registration, Role, SessionPhase, User};

/// Locks ignoring poisoning; the guarded data is always left consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

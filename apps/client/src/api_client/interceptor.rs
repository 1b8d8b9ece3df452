use std::sync::Arc;

use reqwest::StatusCode;
use tracing::warn;

use crate::navigation::{Navigator, LOGIN_ROUTE};
use crate::session::SessionSlot;

/// Observes every response that comes back through `ApiClient`, before the
/// body is decoded and regardless of which endpoint was called.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, status: StatusCode, path: &str);
}

type ExpiredHook = dyn Fn(&str) + Send + Sync;

/// Ends the session whenever the backend answers 401.
pub struct SessionExpiryGuard {
    on_expired: Box<ExpiredHook>,
}

impl SessionExpiryGuard {
    /// `on_expired` receives the path of the request that was refused.
    pub fn new(on_expired: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            on_expired: Box::new(on_expired),
        }
    }

    /// The standard policy: drop the persisted session and go to the login screen.
    pub fn clear_and_redirect(session: Arc<SessionSlot>, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(move |path| {
            warn!("{path} answered 401, ending session");
            session.expire();
            navigator.redirect(LOGIN_ROUTE);
        })
    }
}

impl ResponseInterceptor for SessionExpiryGuard {
    fn on_response(&self, status: StatusCode, path: &str) {
        if status == StatusCode::UNAUTHORIZED {
            (self.on_expired)(path);
        }
    }
}

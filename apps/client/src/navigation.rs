use tracing::info;

/// Screen the client is sent to whenever the session ends.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Hook through which the session layer moves the user to another screen.
///
/// A browser shell would change the location; the CLI just reports it.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}

/// Navigator that only records the transition in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect(&self, route: &str) {
        info!("Session ended, redirecting to {route}");
    }
}

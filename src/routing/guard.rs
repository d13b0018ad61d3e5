use std::sync::Arc;

use super::Route;
use crate::session::SessionContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// `replace` means the guarded entry must not stay in history
    Redirect { to: Route, replace: bool },
}

/// Re-reads the persisted flag on every check; holds no state of its own
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionContext>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }

    pub fn check(&self, route: &Route) -> GuardDecision {
        if route.is_protected() && !self.session.is_authenticated() {
            tracing::debug!(route = %route, "unauthenticated; redirecting to login");
            return GuardDecision::Redirect {
                to: Route::Login,
                replace: true,
            };
        }
        GuardDecision::Allow
    }
}

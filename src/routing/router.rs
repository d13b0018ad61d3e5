use std::sync::Mutex;

use super::{GuardDecision, Route, RouteGuard};

/// Navigation history with the guard applied on every move
pub struct Router {
    guard: RouteGuard,
    history: Mutex<Vec<Route>>,
}

impl Router {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            history: Mutex::new(vec![Route::Home]),
        }
    }

    pub fn navigate(&self, path: &str) -> Route {
        self.navigate_to(Route::parse(path))
    }

    /// Push `route`, or the guard's redirect in its place; returns where we ended up
    pub fn navigate_to(&self, route: Route) -> Route {
        let resolved = self.resolve(route);
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.push(resolved.clone());
        resolved
    }

    /// Swap the current entry instead of pushing
    pub fn replace(&self, route: Route) -> Route {
        let resolved = self.resolve(route);
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.pop();
        history.push(resolved.clone());
        resolved
    }

    /// Pop one entry; the first entry is never removed
    pub fn back(&self) -> Route {
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        if history.len() > 1 {
            history.pop();
        }
        history.last().cloned().unwrap_or(Route::Home)
    }

    pub fn current(&self) -> Route {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.last().cloned().unwrap_or(Route::Home)
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    // A redirect lands in the slot the guarded route would have taken
    fn resolve(&self, route: Route) -> Route {
        match self.guard.check(&route) {
            GuardDecision::Allow => {
                tracing::debug!(route = %route, "navigate");
                route
            }
            GuardDecision::Redirect { to, .. } => to,
        }
    }
}

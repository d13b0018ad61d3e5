//! Session context: the persisted `user` / `isAuthenticated` entries plus the
//! event channel other components subscribe to.

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::error::ClientError;
use crate::models::SessionUser;

pub const USER_KEY: &str = "user";
pub const AUTHENTICATED_KEY: &str = "isAuthenticated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: u64 },
    SignedOut,
    /// A request came back 401; the session has already been cleared
    Unauthorized,
}

pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("stored user entry is unreadable: {}", e);
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.user().map(|u| u.token).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.get(AUTHENTICATED_KEY).as_deref(), Some("true"))
    }

    /// Persist a freshly authenticated user
    pub fn establish(&self, user: &SessionUser) -> Result<(), ClientError> {
        self.write_user(user)?;
        self.store.set(AUTHENTICATED_KEY, "true")?;
        tracing::info!(user_id = user.id, "session established");
        let _ = self.events.send(SessionEvent::SignedIn { user_id: user.id });
        Ok(())
    }

    /// Replace the stored user without touching the authentication flag
    pub fn update_user(&self, user: &SessionUser) -> Result<(), ClientError> {
        self.write_user(user)
    }

    /// Explicit logout
    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        tracing::info!("session cleared");
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    /// Global expiry after a 401: wipe storage and tell the subscriber to redirect
    pub fn invalidate(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("failed to clear session storage: {}", e);
        }
        tracing::warn!("session expired; cleared persisted state");
        let _ = self.events.send(SessionEvent::Unauthorized);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn write_user(&self, user: &SessionUser) -> Result<(), ClientError> {
        let raw = serde_json::to_string(user).map_err(|e| ClientError::storage(e.to_string()))?;
        self.store.set(USER_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: 4,
            name: "Meera".into(),
            email: "meera@example.com".into(),
            token: "t-123".into(),
        }
    }

    #[test]
    fn establish_then_invalidate() {
        let session = SessionContext::in_memory();
        let mut events = session.subscribe();
        assert!(!session.is_authenticated());

        session.establish(&user()).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("t-123"));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::SignedIn { user_id: 4 });

        session.invalidate();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Unauthorized);
    }

    #[test]
    fn update_user_keeps_flag() {
        let session = SessionContext::in_memory();
        session.establish(&user()).unwrap();
        let mut renamed = user();
        renamed.name = "Meera K".into();
        session.update_user(&renamed).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().name, "Meera K");
    }
}

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;

use super::{Route, Router};
use crate::session::{SessionContext, SessionEvent};

/// The single subscriber that turns a 401 anywhere into a trip to `/login`
pub struct UnauthorizedWatcher {
    receiver: broadcast::Receiver<SessionEvent>,
    router: Arc<Router>,
}

impl UnauthorizedWatcher {
    pub fn new(session: &SessionContext, router: Arc<Router>) -> Self {
        Self {
            receiver: session.subscribe(),
            router,
        }
    }

    /// Handle whatever is already queued; returns how many redirects happened
    pub fn drain(&mut self) -> usize {
        let mut redirects = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle(event) {
                        redirects += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session events lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        redirects
    }

    pub async fn run(mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    self.handle(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session events lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    fn handle(&self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Unauthorized => {
                tracing::info!("session expired; redirecting to login");
                self.router.navigate_to(Route::Login);
                true
            }
            _ => false,
        }
    }
}

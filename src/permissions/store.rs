use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::notify::{Alert, Notifier};
use crate::services::ProfileSource;

const LOAD_FAILED_MESSAGE: &str = "Failed to load permission";

/// Membership test against a set of permission names
pub trait PermissionCheck: Send + Sync {
    fn has_permission(&self, name: &str) -> bool;
}

impl PermissionCheck for HashSet<String> {
    fn has_permission(&self, name: &str) -> bool {
        self.contains(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(HashSet<String>),
    Failed(String),
}

/// Permission names of the signed-in user, fetched once from `/me`
pub struct PermissionStore {
    source: Arc<dyn ProfileSource>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<LoadState>,
}

impl PermissionStore {
    pub fn new(source: Arc<dyn ProfileSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            notifier,
            state: RwLock::new(LoadState::Idle),
        }
    }

    /// Fetch the permission set; later calls are no-ops, also while the first is in flight
    pub async fn load(&self) {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            if *state != LoadState::Idle {
                return;
            }
            *state = LoadState::Loading;
        }

        let next = match self.source.me().await {
            Ok(profile) => {
                tracing::debug!(count = profile.permissions.len(), "permissions loaded");
                LoadState::Loaded(profile.permissions.into_iter().collect())
            }
            Err(e) => {
                tracing::warn!("failed to load permissions: {}", e);
                let message = e.message();
                let text = if message.trim().is_empty() {
                    LOAD_FAILED_MESSAGE.to_string()
                } else {
                    message.clone()
                };
                self.notifier.notify(Alert::error(text));
                LoadState::Failed(message)
            }
        };
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = next;
    }

    pub fn state(&self) -> LoadState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state(), LoadState::Loaded(_))
    }

    /// Sorted copy of the loaded set; empty unless loaded
    pub fn permissions(&self) -> Vec<String> {
        match &*self.state.read().unwrap_or_else(|e| e.into_inner()) {
            LoadState::Loaded(set) => {
                let mut names: Vec<String> = set.iter().cloned().collect();
                names.sort();
                names
            }
            _ => Vec::new(),
        }
    }
}

impl PermissionCheck for PermissionStore {
    fn has_permission(&self, name: &str) -> bool {
        match &*self.state.read().unwrap_or_else(|e| e.into_inner()) {
            LoadState::Loaded(set) => set.contains(name),
            _ => false,
        }
    }
}

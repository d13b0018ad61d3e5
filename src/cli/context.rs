use std::sync::Arc;

use crate::api::ApiClient;
use crate::cli::config::{load_settings, CliSettings};
use crate::cli::utils::output_alerts;
use crate::cli::OutputFormat;
use crate::models::ResourceKind;
use crate::notify::AlertQueue;
use crate::permissions::{Action, ActionGate, PermissionStore};
use crate::routing::{Route, RouteGuard, Router, UnauthorizedWatcher};
use crate::services::AuthService;
use crate::session::{FileSessionStore, SessionContext};

/// Everything one command invocation needs, wired the way a page tree would be
pub struct CliContext {
    pub output: OutputFormat,
    pub settings: CliSettings,
    pub session: Arc<SessionContext>,
    pub client: ApiClient,
    pub router: Arc<Router>,
    pub alerts: Arc<AlertQueue>,
    watcher: UnauthorizedWatcher,
    permissions: Option<PermissionStore>,
}

impl CliContext {
    pub fn open(output: OutputFormat) -> anyhow::Result<Self> {
        let settings = load_settings()?;
        let store = FileSessionStore::open_default()?;
        let session = Arc::new(SessionContext::new(Arc::new(store)));
        let client = ApiClient::new(&settings.effective_api_url(), session.clone())?;
        let router = Arc::new(Router::new(RouteGuard::new(session.clone())));
        let watcher = UnauthorizedWatcher::new(&session, router.clone());

        Ok(Self {
            output,
            settings,
            session,
            client,
            router,
            alerts: Arc::new(AlertQueue::new()),
            watcher,
            permissions: None,
        })
    }

    /// Navigate to `route`; fails when the guard sends us to the login page instead
    pub fn enter(&self, route: Route) -> anyhow::Result<()> {
        let requested = route.clone();
        let landed = self.router.navigate_to(route);
        if landed != requested && landed == Route::Login {
            anyhow::bail!("Not signed in. Run `smart-hr auth login` first.");
        }
        Ok(())
    }

    /// Fail unless the signed-in user may perform `action` on `kind`
    pub async fn require(&mut self, kind: ResourceKind, action: Action) -> anyhow::Result<()> {
        let store = self.permissions().await;
        let gate = ActionGate::new(store, kind);
        if !gate.allows(action) {
            anyhow::bail!(
                "You do not have permission to {} {} ({} required)",
                action.as_str(),
                kind.plural(),
                gate.required_permission(action)
            );
        }
        Ok(())
    }

    /// The session's permission set, loaded on first use
    pub async fn permissions(&mut self) -> &PermissionStore {
        let store = match self.permissions.take() {
            Some(store) => store,
            None => {
                let source = Arc::new(AuthService::new(self.client.clone()));
                let store = PermissionStore::new(source, self.alerts.clone());
                store.load().await;
                store
            }
        };
        self.permissions.insert(store)
    }

    /// Gate over the already loaded permission set
    pub fn gate(&self, kind: ResourceKind) -> Option<ActionGate<'_, PermissionStore>> {
        self.permissions.as_ref().map(|store| ActionGate::new(store, kind))
    }

    /// Apply any pending 401 redirect and print queued alerts
    pub fn finish(&mut self) -> anyhow::Result<()> {
        if self.watcher.drain() > 0 {
            eprintln!("Session expired. Please sign in again with `smart-hr auth login`.");
        }
        output_alerts(&self.output, &self.alerts.drain())
    }
}

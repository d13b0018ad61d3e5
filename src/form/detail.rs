use std::sync::Arc;

use crate::error::ClientError;
use crate::notify::{Alert, Notifier};
use crate::routing::{Route, Router};
use crate::services::ResourceService;

/// Read-only record page with edit and delete
pub struct DetailController<S: ResourceService> {
    service: Arc<S>,
    router: Arc<Router>,
    notifier: Arc<dyn Notifier>,
    id: u64,
    entity: Option<S::Item>,
}

impl<S: ResourceService> DetailController<S> {
    pub fn new(service: Arc<S>, router: Arc<Router>, notifier: Arc<dyn Notifier>, id: u64) -> Self {
        Self {
            service,
            router,
            notifier,
            id,
            entity: None,
        }
    }

    pub async fn load(&mut self) -> Result<&S::Item, ClientError> {
        match self.service.get(self.id).await {
            Ok(entity) => Ok(self.entity.insert(entity)),
            Err(e) => {
                self.notifier.notify(Alert::error(e.message()));
                Err(e)
            }
        }
    }

    pub fn entity(&self) -> Option<&S::Item> {
        self.entity.as_ref()
    }

    pub fn edit_route(&self) -> Route {
        Route::Edit(self.service.kind(), self.id)
    }

    /// Delete the record and return to its list
    pub async fn delete(&mut self) -> Result<Route, ClientError> {
        let kind = self.service.kind();
        if let Err(e) = self.service.remove(self.id).await {
            self.notifier.notify(Alert::error(e.message()));
            return Err(e);
        }
        self.entity = None;
        self.notifier.notify(Alert::success(
            "Deleted",
            format!("{} deleted successfully", kind.singular()),
        ));
        Ok(self.router.navigate_to(kind.list_route()))
    }
}

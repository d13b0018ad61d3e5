//! Client route table, route guard and navigation history.

pub mod guard;
pub mod router;
pub mod watcher;

pub use guard::{GuardDecision, RouteGuard};
pub use router::Router;
pub use watcher::UnauthorizedWatcher;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Home,
    Dashboard,
    EmployeeDashboard,
    Profile,
    Settings,
    UpdateProfile,
    ChangePassword,
    DeleteAccount,
    List(ResourceKind),
    Create(ResourceKind),
    Detail(ResourceKind, u64),
    Edit(ResourceKind, u64),
    MasterDataImport,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["employee-dashboard"] => Route::EmployeeDashboard,
            ["profile"] => Route::Profile,
            ["settings"] => Route::Settings,
            ["update-profile"] => Route::UpdateProfile,
            ["change-password"] => Route::ChangePassword,
            ["delete-account"] => Route::DeleteAccount,
            ["master-data", "import"] => Route::MasterDataImport,
            [resource, rest @ ..] => match (ResourceKind::from_path(resource), rest) {
                (Some(kind), []) => Route::List(kind),
                (Some(kind), ["create"]) => Route::Create(kind),
                (Some(kind), [id]) => match id.parse() {
                    Ok(id) => Route::Detail(kind, id),
                    Err(_) => Route::NotFound(trimmed.to_string()),
                },
                (Some(kind), [id, "edit"]) => match id.parse() {
                    Ok(id) => Route::Edit(kind, id),
                    Err(_) => Route::NotFound(trimmed.to_string()),
                },
                _ => Route::NotFound(trimmed.to_string()),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Home => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::EmployeeDashboard => "/employee-dashboard".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::UpdateProfile => "/update-profile".to_string(),
            Route::ChangePassword => "/change-password".to_string(),
            Route::DeleteAccount => "/delete-account".to_string(),
            Route::List(kind) => format!("/{}", kind.api_path()),
            Route::Create(kind) => format!("/{}/create", kind.api_path()),
            Route::Detail(kind, id) => format!("/{}/{}", kind.api_path(), id),
            Route::Edit(kind, id) => format!("/{}/{}/edit", kind.api_path(), id),
            Route::MasterDataImport => "/master-data/import".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Everything except the sign-in pages, the landing page and unknown paths
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Login | Route::Register | Route::Home | Route::NotFound(_)
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

impl ResourceKind {
    pub fn list_route(&self) -> Route {
        Route::List(*self)
    }
}

use serde::Serialize;

use super::PermissionCheck;
use crate::models::ResourceKind;
use crate::routing::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Edit,
    Delete,
    Add,
    Import,
    Export,
    Activate,
    Deactivate,
    Refresh,
    Manage,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Add => "add",
            Action::Import => "import",
            Action::Export => "export",
            Action::Activate => "activate",
            Action::Deactivate => "deactivate",
            Action::Refresh => "refresh",
            Action::Manage => "manage",
        }
    }

    /// Verb checked against the permission set
    pub fn permission_verb(&self) -> &'static str {
        match self {
            Action::Activate | Action::Deactivate => "edit",
            Action::Manage | Action::Refresh => "view",
            other => other.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
            Action::Add => "Add",
            Action::Import => "Import",
            Action::Export => "Export",
            Action::Activate => "Activate",
            Action::Deactivate => "Deactivate",
            Action::Refresh => "Refresh",
            Action::Manage => "Manage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "route", rename_all = "lowercase")]
pub enum AffordanceTarget {
    /// Navigates to a client route
    Link(Route),
    /// Runs in place on the current page
    Button,
}

/// One visible control; denied actions produce none at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordance {
    pub action: Action,
    pub label: String,
    pub target: AffordanceTarget,
}

/// Decides which controls a resource page shows
pub struct ActionGate<'a, P: PermissionCheck + ?Sized> {
    perms: &'a P,
    kind: ResourceKind,
}

impl<'a, P: PermissionCheck + ?Sized> ActionGate<'a, P> {
    pub fn new(perms: &'a P, kind: ResourceKind) -> Self {
        Self { perms, kind }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// `{verb}-{resource}`, e.g. `edit-master-data` for Deactivate
    pub fn required_permission(&self, action: Action) -> String {
        format!("{}-{}", action.permission_verb(), self.kind.permission_subject())
    }

    pub fn allows(&self, action: Action) -> bool {
        self.perms.has_permission(&self.required_permission(action))
    }

    pub fn affordance(&self, action: Action, id: Option<u64>) -> Option<Affordance> {
        if !self.allows(action) {
            return None;
        }
        let target = match (action, id) {
            (Action::View, Some(id)) => AffordanceTarget::Link(Route::Detail(self.kind, id)),
            (Action::Edit, Some(id)) => AffordanceTarget::Link(Route::Edit(self.kind, id)),
            (Action::Add, _) => AffordanceTarget::Link(Route::Create(self.kind)),
            (Action::Import, _) if self.kind == ResourceKind::MasterData => {
                AffordanceTarget::Link(Route::MasterDataImport)
            }
            (Action::Manage, _) => AffordanceTarget::Link(Route::List(self.kind)),
            _ => AffordanceTarget::Button,
        };
        Some(Affordance {
            action,
            label: action.label().to_string(),
            target,
        })
    }

    /// Page-level controls above the table
    pub fn toolbar(&self) -> Vec<Affordance> {
        [Action::Refresh, Action::Add, Action::Import, Action::Export]
            .into_iter()
            .filter_map(|action| self.affordance(action, None))
            .collect()
    }

    /// Controls on one row; `status` is set for rows that can be toggled
    pub fn row_actions(&self, id: u64, status: Option<bool>) -> Vec<Affordance> {
        let toggle = match status {
            Some(true) => Some(Action::Deactivate),
            Some(false) => Some(Action::Activate),
            None => None,
        };
        toggle
            .into_iter()
            .chain([Action::View, Action::Edit, Action::Delete])
            .filter_map(|action| self.affordance(action, Some(id)))
            .collect()
    }
}

use serde::{Deserialize, Serialize};

use crate::types::SortDirection;

/// The four resource types managed by the admin pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Users,
    Roles,
    Permissions,
    MasterData,
}

/// Fixed list-page behaviour for one resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePreset {
    pub per_page: u32,
    pub sort: &'static str,
    pub dir: SortDirection,
    /// When false the sort column and direction never change
    pub sortable: bool,
    pub filter_keys: &'static [&'static str],
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Users,
        ResourceKind::Roles,
        ResourceKind::Permissions,
        ResourceKind::MasterData,
    ];

    /// Collection path below the API base, also the client route prefix
    pub fn api_path(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Roles => "roles",
            ResourceKind::Permissions => "permissions",
            ResourceKind::MasterData => "master-data",
        }
    }

    /// Resource half of the `{action}-{resource}` permission string
    pub fn permission_subject(&self) -> &'static str {
        match self {
            ResourceKind::Users => "user",
            ResourceKind::Roles => "role",
            ResourceKind::Permissions => "permission",
            ResourceKind::MasterData => "master-data",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Users => "User",
            ResourceKind::Roles => "Role",
            ResourceKind::Permissions => "Permission",
            ResourceKind::MasterData => "Master Data",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Roles => "roles",
            ResourceKind::Permissions => "permissions",
            ResourceKind::MasterData => "master data",
        }
    }

    pub fn from_path(segment: &str) -> Option<Self> {
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.api_path() == segment)
    }

    pub fn preset(&self) -> TablePreset {
        match self {
            ResourceKind::Users => TablePreset {
                per_page: 5,
                sort: "id",
                dir: SortDirection::Desc,
                sortable: false,
                filter_keys: &[],
            },
            ResourceKind::Roles | ResourceKind::Permissions => TablePreset {
                per_page: 10,
                sort: "id",
                dir: SortDirection::Desc,
                sortable: false,
                filter_keys: &[],
            },
            ResourceKind::MasterData => TablePreset {
                per_page: 10,
                sort: "id",
                dir: SortDirection::Desc,
                sortable: true,
                filter_keys: &["type", "parent"],
            },
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_path())
    }
}

use serde::{Deserialize, Serialize};

use super::Entity;

/// A permission row as managed on the permissions pages
///
/// `name` is the `{action}-{resource}` string checked by the client; `label` and
/// `module` are for display and grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for PermissionRecord {
    fn id(&self) -> u64 {
        self.id
    }
}

use serde::{Deserialize, Serialize};

use super::{Entity, PermissionRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<PermissionRecord>,
}

impl Entity for Role {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Role {
    pub fn display_name(&self) -> String {
        if !self.label.is_empty() {
            return self.label.clone();
        }
        self.name.clone().unwrap_or_default()
    }
}

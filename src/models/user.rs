use serde::{Deserialize, Serialize};

use super::{Entity, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Legacy single-role column still sent by some endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Entity for User {
    fn id(&self) -> u64 {
        self.id
    }
}

impl User {
    /// Role labels joined for display
    pub fn role_labels(&self) -> String {
        if self.roles.is_empty() {
            return self.role.clone().unwrap_or_default();
        }
        self.roles
            .iter()
            .map(|r| r.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

use serde::{Deserialize, Serialize};

use super::{flexible_bool, flexible_id, Entity, ParentRef, StatusEntity};

/// One typed lookup value; `parent_id` points at most one level up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub parent_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub status: bool,
}

impl Entity for MasterData {
    fn id(&self) -> u64 {
        self.id
    }
}

impl StatusEntity for MasterData {
    fn status(&self) -> bool {
        self.status
    }

    fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}

impl MasterData {
    pub fn status_label(&self) -> &'static str {
        if self.status {
            "Active"
        } else {
            "Inactive"
        }
    }

    pub fn parent_name(&self) -> &str {
        self.parent.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_accepts_integers_and_booleans() {
        let a: MasterData = serde_json::from_value(json!({"id": 1, "type": "Unit", "name": "Kg", "status": 1})).unwrap();
        let b: MasterData = serde_json::from_value(json!({"id": 2, "type": "Unit", "name": "g", "status": false})).unwrap();
        assert!(a.status);
        assert!(!b.status);
        assert_eq!(a.kind, "Unit");
    }

    #[test]
    fn partial_toggle_response_still_parses() {
        let m: MasterData = serde_json::from_value(json!({"status": "0"})).unwrap();
        assert!(!m.status);
        assert_eq!(m.parent_id, None);
    }

    #[test]
    fn parent_id_accepts_numeric_strings() {
        let m: MasterData = serde_json::from_value(json!({"id": 7, "parent_id": "3", "status": true})).unwrap();
        assert_eq!(m.parent_id, Some(3));
    }
}

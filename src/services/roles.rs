use std::collections::BTreeMap;

use serde_json::Value;

use super::resource::RoleService;
use crate::api::unwrap_data;
use crate::error::ClientError;
use crate::models::PermissionRecord;

/// Module name -> permissions, as offered on the role form
pub type PermissionGroups = BTreeMap<String, Vec<PermissionRecord>>;

impl RoleService {
    /// Assignable permissions from `/role-permissions`
    ///
    /// Accepts either a module-keyed object or a flat list, which is grouped by `module`.
    pub async fn grouped_permissions(&self) -> Result<PermissionGroups, ClientError> {
        let value: Value = self.client().get_json("role-permissions", &[]).await?;
        group_permissions(unwrap_data(value))
    }
}

pub(crate) fn group_permissions(value: Value) -> Result<PermissionGroups, ClientError> {
    match value {
        Value::Array(_) => {
            let records: Vec<PermissionRecord> = serde_json::from_value(value)?;
            let mut groups = PermissionGroups::new();
            for record in records {
                let module = if record.module.is_empty() {
                    "general".to_string()
                } else {
                    record.module.clone()
                };
                groups.entry(module).or_default().push(record);
            }
            Ok(groups)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}

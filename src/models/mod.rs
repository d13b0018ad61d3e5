pub mod envelope;
pub mod master_data;
pub mod permission;
pub mod resource_kind;
pub mod role;
pub mod session;
pub mod user;

pub use envelope::{Envelope, PageLinks, PageMeta, ParentRef};
pub use master_data::MasterData;
pub use permission::PermissionRecord;
pub use resource_kind::{ResourceKind, TablePreset};
pub use role::Role;
pub use session::{AuthResponse, Profile, SessionUser};
pub use user::User;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A record served by one of the resource endpoints
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    fn id(&self) -> u64;
}

/// Records carrying an active/inactive flag that can be toggled in place
pub trait StatusEntity: Entity {
    fn status(&self) -> bool;
    fn set_status(&mut self, status: bool);
}

/// Accepts `true`/`false`, `1`/`0` and `"1"`/`"0"` for boolean columns
pub(crate) fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().map(|v| v != 0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "active"),
        _ => false,
    })
}

/// Accepts numeric ids sent either as numbers or numeric strings; anything else is `None`
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

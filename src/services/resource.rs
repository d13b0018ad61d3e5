use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::api::{unwrap_data, ApiClient, ListQuery};
use crate::error::ClientError;
use crate::models::{Entity, Envelope, MasterData, PermissionRecord, ResourceKind, Role, User};

/// CRUD over one REST collection
#[async_trait]
pub trait ResourceService: Send + Sync {
    type Item: Entity;

    fn kind(&self) -> ResourceKind;

    /// `GET /{resource}` with the query state as parameters
    async fn list(&self, query: &ListQuery) -> Result<Envelope<Self::Item>, ClientError>;

    async fn get(&self, id: u64) -> Result<Self::Item, ClientError>;

    /// Any 2xx counts as saved; the record is `None` when the body does not carry it
    async fn create(&self, payload: &Value) -> Result<Option<Self::Item>, ClientError>;

    async fn update(&self, id: u64, payload: &Value) -> Result<Option<Self::Item>, ClientError>;

    async fn remove(&self, id: u64) -> Result<(), ClientError>;

    /// `POST /{resource}/bulk-delete {ids}`
    async fn bulk_remove(&self, ids: &[u64]) -> Result<(), ClientError>;
}

/// Resources whose rows can be switched active/inactive in place
#[async_trait]
pub trait StatusToggle: ResourceService {
    /// Returns the status the server reports after the change
    async fn toggle_status(&self, id: u64, status: bool) -> Result<bool, ClientError>;
}

/// `ResourceService` over the shared authenticated client
pub struct HttpResource<E> {
    client: ApiClient,
    kind: ResourceKind,
    _entity: PhantomData<fn() -> E>,
}

pub type UserService = HttpResource<User>;
pub type RoleService = HttpResource<Role>;
pub type PermissionService = HttpResource<PermissionRecord>;
pub type MasterDataService = HttpResource<MasterData>;

impl<E> HttpResource<E> {
    pub(crate) fn with_kind(client: ApiClient, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            _entity: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub(crate) fn collection(&self) -> &'static str {
        self.kind.api_path()
    }

    pub(crate) fn member(&self, id: u64) -> String {
        format!("{}/{}", self.kind.api_path(), id)
    }
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self::with_kind(client, ResourceKind::Users)
    }
}

impl RoleService {
    pub fn new(client: ApiClient) -> Self {
        Self::with_kind(client, ResourceKind::Roles)
    }
}

impl PermissionService {
    pub fn new(client: ApiClient) -> Self {
        Self::with_kind(client, ResourceKind::Permissions)
    }
}

impl MasterDataService {
    pub fn new(client: ApiClient) -> Self {
        Self::with_kind(client, ResourceKind::MasterData)
    }
}

fn decode_entity<E: Entity>(value: Value) -> Result<E, ClientError> {
    Ok(serde_json::from_value(unwrap_data(value))?)
}

/// The record echoed by a write, bare, under `data`, or under another key like `user`
fn saved_record<E: Entity>(value: Value) -> Option<E> {
    let nested: Vec<Value> = match &value {
        Value::Object(map) => map.values().filter(|v| v.is_object()).cloned().collect(),
        _ => Vec::new(),
    };
    std::iter::once(unwrap_data(value))
        .chain(nested)
        .find_map(|candidate| serde_json::from_value(candidate).ok())
}

#[async_trait]
impl<E: Entity> ResourceService for HttpResource<E> {
    type Item = E;

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn list(&self, query: &ListQuery) -> Result<Envelope<E>, ClientError> {
        let envelope: Envelope<E> = self.client.get_json(self.collection(), &query.to_pairs()).await?;
        tracing::debug!(
            resource = %self.kind,
            page = envelope.meta.current_page,
            rows = envelope.data.len(),
            "list fetched"
        );
        Ok(envelope)
    }

    async fn get(&self, id: u64) -> Result<E, ClientError> {
        let value: Value = self.client.get_json(&self.member(id), &[]).await?;
        decode_entity(value)
    }

    async fn create(&self, payload: &Value) -> Result<Option<E>, ClientError> {
        let value = self.client.write_json(Method::POST, self.collection(), payload).await?;
        let created: Option<E> = saved_record(value);
        match &created {
            Some(record) => tracing::info!(resource = %self.kind, id = record.id(), "created"),
            None => tracing::info!(resource = %self.kind, "created, no record in response"),
        }
        Ok(created)
    }

    async fn update(&self, id: u64, payload: &Value) -> Result<Option<E>, ClientError> {
        let value = self.client.write_json(Method::PUT, &self.member(id), payload).await?;
        tracing::info!(resource = %self.kind, id, "updated");
        Ok(saved_record(value))
    }

    async fn remove(&self, id: u64) -> Result<(), ClientError> {
        self.client.delete(&self.member(id)).await?;
        tracing::info!(resource = %self.kind, id, "deleted");
        Ok(())
    }

    async fn bulk_remove(&self, ids: &[u64]) -> Result<(), ClientError> {
        let path = format!("{}/bulk-delete", self.collection());
        let _: Value = self.client.post_json(&path, &json!({ "ids": ids })).await?;
        tracing::info!(resource = %self.kind, count = ids.len(), "bulk deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionContext;
    use std::sync::Arc;

    fn client() -> ApiClient {
        let session = Arc::new(SessionContext::in_memory());
        ApiClient::with_http(reqwest::Client::new(), "http://localhost:8000/api/", session).unwrap()
    }

    #[test]
    fn member_paths_follow_collection() {
        let md = MasterDataService::new(client());
        assert_eq!(md.member(12), "master-data/12");
        assert_eq!(md.kind(), ResourceKind::MasterData);
        assert_eq!(UserService::new(client()).collection(), "users");
    }

    #[test]
    fn entity_decodes_with_or_without_data_wrapper() {
        let wrapped: Role = decode_entity(json!({"data": {"id": 3, "label": "Manager"}})).unwrap();
        let bare: Role = decode_entity(json!({"id": 3, "label": "Manager"})).unwrap();
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn saved_record_is_optional() {
        let nested: Option<User> = saved_record(json!({
            "message": "User created successfully",
            "user": {"id": 10, "name": "Ravi", "email": "ravi@example.com"}
        }));
        assert_eq!(nested.map(|u| u.id), Some(10));

        let wrapped: Option<Role> = saved_record(json!({"data": {"id": 3, "label": "Manager"}}));
        assert_eq!(wrapped.map(|r| r.id), Some(3));

        assert!(saved_record::<User>(json!({"message": "User created successfully"})).is_none());
        assert!(saved_record::<User>(Value::Null).is_none());
    }
}

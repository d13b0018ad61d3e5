use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{unwrap_data, ApiClient};
use crate::error::ClientError;
use crate::form::check_password_confirmation;
use crate::models::{AuthResponse, Profile, SessionUser};

/// Anything that can answer "who is signed in and what may they do"
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn me(&self) -> Result<Profile, ClientError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmed_password: String,
}

/// `PUT /profile`; an empty password leaves it unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmed_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Account endpoints plus session bookkeeping
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<SessionUser, ClientError> {
        let response: AuthResponse = self.client.post_json("login", credentials).await?;
        let user = response.into_session_user(None)?;
        self.client.session().establish(&user)?;
        Ok(user)
    }

    /// Blocks with `PasswordMismatch` before anything is sent
    pub async fn register(&self, registration: &Registration) -> Result<SessionUser, ClientError> {
        check_password_confirmation(&registration.password, &registration.confirmed_password, true)?;
        let response: AuthResponse = self.client.post_json("register", registration).await?;
        let user = response.into_session_user(None)?;
        self.client.session().establish(&user)?;
        Ok(user)
    }

    /// Best effort server logout; local session is cleared regardless
    pub async fn logout(&self) -> Result<(), ClientError> {
        if self.client.session().is_authenticated() {
            if let Err(e) = self.client.post_json::<Value, _>("logout", &Value::Null).await {
                tracing::warn!("server logout failed: {}", e);
            }
        }
        self.client.session().clear()
    }

    pub async fn profile(&self) -> Result<Profile, ClientError> {
        let value: Value = self.client.get_json("profile", &[]).await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    /// Update name/email and optionally the password, then refresh the stored user
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<SessionUser, ClientError> {
        check_password_confirmation(&update.password, &update.confirmed_password, false)?;
        let response: AuthResponse = self.client.put_json("profile", update).await?;
        let previous = self.client.session().user();
        let user = response.into_session_user(previous.as_ref())?;
        self.client.session().update_user(&user)?;
        Ok(user)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ClientError> {
        check_password_confirmation(&change.password, &change.password_confirmation, true)?;
        let _: Value = self.client.put_json("change-password", change).await?;
        tracing::info!("password changed");
        Ok(())
    }

    pub async fn delete_account(&self) -> Result<(), ClientError> {
        self.client.delete("delete-account").await?;
        tracing::info!("account deleted");
        self.client.session().clear()
    }
}

#[async_trait]
impl ProfileSource for AuthService {
    async fn me(&self) -> Result<Profile, ClientError> {
        let value: Value = self.client.get_json("me", &[]).await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }
}

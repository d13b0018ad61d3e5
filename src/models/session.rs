use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// The persisted `user` entry: identity plus the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Body returned by `/login`, `/register` and `PUT /profile`
///
/// Profile updates may omit the token, in which case the current one is kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
    /// Some deployments nest the user object
    #[serde(default)]
    pub user: Option<Box<AuthResponse>>,
}

impl AuthResponse {
    pub fn into_session_user(self, previous: Option<&SessionUser>) -> Result<SessionUser, ClientError> {
        let nested = self.user.map(|u| *u).unwrap_or_default();

        let token = self
            .token
            .or(nested.token)
            .or_else(|| previous.map(|p| p.token.clone()))
            .ok_or_else(|| ClientError::Decode("authentication response carried no token".into()))?;

        let id = self
            .id
            .or(nested.id)
            .or_else(|| previous.map(|p| p.id))
            .unwrap_or_default();
        let name = self
            .name
            .or(nested.name)
            .or_else(|| previous.map(|p| p.name.clone()))
            .unwrap_or_default();
        let email = self
            .email
            .or(nested.email)
            .or_else(|| previous.map(|p| p.email.clone()))
            .unwrap_or_default();

        Ok(SessionUser { id, name, email, token })
    }
}

/// `/me`: the signed-in user with the flattened permission set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub roles: Vec<serde_json::Value>,
}

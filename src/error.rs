// Client error types
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Text used when a request never produced a response
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Text used when the server did not supply a message of its own
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Field name -> ordered validation messages, exactly as the server sent them
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// One rejected row of a master data import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row: u64,
    pub attribute: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// The `errors` member of a failure body: a per-field map or a per-row list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Fields(FieldErrors),
    Rows(Vec<ImportRowError>),
}

/// Failure body returned by the backend (`{message, errors?}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ErrorBody {
    pub fn details(&self) -> Option<ErrorDetails> {
        self.errors
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

/// Every failed client operation, normalized to `{message, errors?}`
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    // No response at all (DNS, refused connection, timeout)
    #[error("{0}")]
    Network(String),

    // 401, handled globally by clearing the session
    #[error("{0}")]
    Unauthorized(String),

    // 403
    #[error("{0}")]
    Forbidden(String),

    // 404
    #[error("{0}")]
    NotFound(String),

    // 422 (or any status) carrying a per-field map
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    // Import rejected row by row
    #[error("{message}")]
    Import { message: String, rows: Vec<ImportRowError> },

    // Anything else the server answered with
    #[error("{message}")]
    Server { status: u16, message: String },

    // Blocked before a request was sent
    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Normalize a non-success response into the client taxonomy
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => parsed,
            Err(_) => match serde_json::from_slice::<Vec<ImportRowError>>(body) {
                // Some import failures arrive as a bare row list
                Ok(rows) => ErrorBody {
                    message: None,
                    errors: Some(json!(rows)),
                },
                Err(_) => ErrorBody::default(),
            },
        };

        let details = parsed.details();
        let message = parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

        if status == 401 {
            return ClientError::Unauthorized(message);
        }

        match details {
            Some(ErrorDetails::Fields(errors)) if !errors.is_empty() => {
                ClientError::Validation { message, errors }
            }
            Some(ErrorDetails::Rows(rows)) if !rows.is_empty() => {
                ClientError::Import { message, rows }
            }
            _ => match status {
                403 => ClientError::Forbidden(message),
                404 => ClientError::NotFound(message),
                _ => ClientError::Server { status, message },
            },
        }
    }

    pub fn network() -> Self {
        ClientError::Network(NETWORK_ERROR_MESSAGE.to_string())
    }

    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        ClientError::Validation {
            message: message.into(),
            errors,
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ClientError::Storage(message.into())
    }

    /// HTTP status, when the failure came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Validation { .. } | ClientError::Import { .. } => Some(422),
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn import_rows(&self) -> Option<&[ImportRowError]> {
        match self {
            ClientError::Import { rows, .. } => Some(rows),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Forbidden(_) => "FORBIDDEN",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::Import { .. } => "IMPORT_ERROR",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::PasswordMismatch => "PASSWORD_MISMATCH",
            ClientError::Decode(_) => "INVALID_RESPONSE",
            ClientError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// The normalized `{message, errors?}` shape
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "message": self.message(),
            "code": self.error_code(),
        });
        match self {
            ClientError::Validation { errors, .. } => body["errors"] = json!(errors),
            ClientError::Import { rows, .. } => body["errors"] = json!(rows),
            _ => {}
        }
        body
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::Decode(err.to_string());
        }
        tracing::warn!("transport failure: {}", err);
        ClientError::network()
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

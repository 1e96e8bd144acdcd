//! Error taxonomy for backend calls
//!
//! Every failure the API layer can surface is an [`ApiError`]. Views use
//! [`ApiError::kind`] to decide how to present it and
//! [`ApiError::user_message`] for the generic text.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Field name -> messages reported by the backend for a rejected form
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors returned by the API client and authentication service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Coarse classification used by views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Auth,
    Validation,
    Server,
    Other,
}

impl ApiError {
    /// Map a non-success response into the taxonomy
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = ErrorBody::parse(body);
        let message = parsed
            .message()
            .unwrap_or_else(|| default_message(status).to_string());

        match status {
            400 | 422 => ApiError::Validation {
                message,
                fields: parsed.field_errors(),
            },
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            409 => ApiError::Conflict { message },
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Status { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Unauthorized { .. }
            | ApiError::Forbidden { .. }
            | ApiError::InvalidCredentials
            | ApiError::SessionExpired => ErrorKind::Auth,
            ApiError::Validation { .. } | ApiError::DuplicateUser(_) => ErrorKind::Validation,
            ApiError::Server { .. } => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }

    /// HTTP status the error was built from, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Conflict { .. } | ApiError::DuplicateUser(_) => Some(409),
            ApiError::Server { status, .. } | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the user has to sign in again
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::SessionExpired | ApiError::Unauthorized { .. }
        )
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Network => "Network error. Please try again.".to_string(),
            ErrorKind::Server => "Something went wrong on our side. Please try again later.".to_string(),
            _ => self.to_string(),
        }
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Authentication required",
        403 => "You do not have access to this resource",
        404 => "Resource not found",
        409 => "Conflict",
        422 => "Validation failed",
        500..=599 => "Internal server error",
        _ => "Request failed",
    }
}

/// Lenient view of the error bodies the backend sends
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default, alias = "fields")]
    errors: Option<serde_json::Value>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn message(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        [&self.error, &self.detail]
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str().map(str::to_string))
    }

    fn field_errors(&self) -> FieldErrors {
        let mut fields = FieldErrors::new();
        let Some(serde_json::Value::Object(map)) = &self.errors else {
            return fields;
        };

        for (field, value) in map {
            let messages: Vec<String> = match value {
                serde_json::Value::String(s) => vec![s.clone()],
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect(),
                _ => continue,
            };
            if !messages.is_empty() {
                fields.insert(field.clone(), messages);
            }
        }
        fields
    }
}

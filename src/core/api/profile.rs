//! Profile endpoints for the signed-in user

use serde::{Deserialize, Serialize};

use super::Record;
use crate::core::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::http::{HttpTransport, MultipartPart};
use crate::core::session::{Role, UserRecord};
use crate::core::token_store::TokenStore;

/// Editable profile fields; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub struct ProfileApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
    role: Role,
}

impl<'a, T, S> ProfileApi<'a, T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    /// Profile calls go to the area of `role` (`student/profile`, ...)
    pub fn new(client: &'a ApiClient<T, S>, role: Role) -> Self {
        Self { client, role }
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}/profile{}", self.role.as_str(), suffix)
    }

    /// The account the backend associates with the current token
    pub async fn me(&self) -> Result<UserRecord, ApiError> {
        let value: serde_json::Value = self.client.get("auth/me").await?;
        let user = match value {
            serde_json::Value::Object(mut map) if map.contains_key("user") => {
                map.remove("user").unwrap_or_default()
            }
            other => other,
        };
        serde_json::from_value(user).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn profile(&self) -> Result<Record, ApiError> {
        self.client.get(&self.path("")).await
    }

    pub async fn update(&self, changes: &ProfileUpdate) -> Result<Record, ApiError> {
        self.client.put(&self.path(""), changes).await
    }

    pub async fn upload_photo(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Record, ApiError> {
        tracing::debug!("Uploading profile photo {} ({} bytes)", file_name, data.len());
        let part = MultipartPart::file("photo", file_name, content_type, data);
        self.client.upload(&self.path("/photo"), vec![part]).await
    }
}

//! Admin area endpoints (`/api/admin/*`)

use serde::{Deserialize, Serialize};

use super::{Record, segment, unwrap_list};
use crate::core::client::ApiClient;
use crate::core::error::{ApiError, ErrorKind};
use crate::core::http::HttpTransport;
use crate::core::session::Role;
use crate::core::token_store::TokenStore;

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    #[serde(alias = "students")]
    pub total_students: u64,
    #[serde(alias = "faculty")]
    pub total_faculty: u64,
    #[serde(alias = "courses")]
    pub total_courses: u64,
    #[serde(alias = "alerts")]
    pub active_alerts: u64,
}

/// A value that may be standing in for data that could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub struct Degraded<T> {
    pub value: T,
    /// Set when `value` is a placeholder; the error that caused it
    pub cause: Option<ApiError>,
}

impl<T> Degraded<T> {
    pub fn live(value: T) -> Self {
        Self { value, cause: None }
    }

    pub fn placeholder(value: T, cause: ApiError) -> Self {
        Self {
            value,
            cause: Some(cause),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.cause.is_some()
    }
}

/// Account created by an administrator
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub struct AdminApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T, S> AdminApi<'a, T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    pub fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub async fn users(&self) -> Result<Vec<Record>, ApiError> {
        unwrap_list(self.client.get("admin/users").await?, "users")
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<Record, ApiError> {
        self.client.post("admin/users", user).await
    }

    pub async fn update_user(&self, user_id: &str, changes: &Record) -> Result<Record, ApiError> {
        self.client
            .put(&format!("admin/users/{}", segment(user_id)), changes)
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        let _: Option<Record> = self
            .client
            .delete(&format!("admin/users/{}", segment(user_id)))
            .await?;
        Ok(())
    }

    pub async fn courses(&self) -> Result<Vec<Record>, ApiError> {
        unwrap_list(self.client.get("admin/courses").await?, "courses")
    }

    pub async fn stats(&self) -> Result<AdminStats, ApiError> {
        self.client.get("admin/stats").await
    }

    /// Statistics, or zeroed placeholders flagged as degraded when the
    /// endpoint fails. Authentication failures are still returned as errors
    /// so the caller can send the user back to the login page.
    pub async fn stats_or_placeholder(&self) -> Result<Degraded<AdminStats>, ApiError> {
        match self.stats().await {
            Ok(stats) => Ok(Degraded::live(stats)),
            Err(e) if e.kind() == ErrorKind::Auth => Err(e),
            Err(e) => {
                tracing::warn!("Admin statistics unavailable, showing placeholders: {}", e);
                Ok(Degraded::placeholder(AdminStats::default(), e))
            }
        }
    }
}

//! Alert/notification endpoints (`/api/alerts/*`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{segment, unwrap_list};
use crate::core::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::http::HttpTransport;
use crate::core::token_store::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    #[default]
    Info,
    Success,
    Warning,
    #[serde(alias = "error", alias = "danger")]
    Critical,
}

impl AlertSeverity {
    pub fn display_name(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "Info",
            AlertSeverity::Success => "Success",
            AlertSeverity::Warning => "Warning",
            AlertSeverity::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "crate::core::session::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "type")]
    pub severity: AlertSeverity,
    #[serde(default, alias = "is_read")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub struct AlertsApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T, S> AlertsApi<'a, T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    pub fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// All alerts for the signed-in user, newest first
    pub async fn list(&self) -> Result<Vec<Alert>, ApiError> {
        let mut alerts: Vec<Alert> = unwrap_list(self.client.get("alerts").await?, "alerts")?;
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    pub async fn unread_count(&self) -> Result<usize, ApiError> {
        Ok(self.list().await?.iter().filter(|a| !a.read).count())
    }

    pub async fn mark_read(&self, alert_id: &str) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self
            .client
            .put(
                &format!("alerts/{}/read", segment(alert_id)),
                &serde_json::json!({"read": true}),
            )
            .await?;
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self
            .client
            .put("alerts/read-all", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    pub async fn dismiss(&self, alert_id: &str) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self
            .client
            .delete(&format!("alerts/{}", segment(alert_id)))
            .await?;
        Ok(())
    }
}

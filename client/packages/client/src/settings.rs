use std::collections::BTreeMap;

use agent_console_credentials::ProviderConnections;
use agent_console_error::ConsoleError;
use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::SettingsApi;
use crate::http::ApiClient;

const SETTINGS_PATH: &str = "/api/settings";

/// The slice of user settings this client reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct Settings {
    /// Provider id to the host recorded for it; presence means connected.
    #[serde(default)]
    pub provider_tokens_set: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub notion_api_key_set: bool,
    #[serde(default)]
    pub notion_database_id: Option<String>,
}

impl Settings {
    pub fn connections(&self) -> ProviderConnections {
        ProviderConnections::from_tokens_set(
            self.provider_tokens_set
                .iter()
                .map(|(provider, host)| (provider.as_str(), host.clone())),
        )
    }
}

/// Partial settings update for the Notion integration. Absent fields are
/// left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema, ToSchema)]
pub struct NotionSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notion_api_key: Option<String>,
    /// `Some(None)` clears the stored database id.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub notion_database_id: Option<Option<String>>,
}

impl NotionSettingsUpdate {
    /// Blank inputs are omitted rather than sent as empty strings.
    pub fn save(api_key: &str, database_id: &str) -> Self {
        let non_blank = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        Self {
            notion_api_key: non_blank(api_key),
            notion_database_id: non_blank(database_id).map(Some),
        }
    }

    pub fn disconnect() -> Self {
        Self {
            notion_api_key: Some(String::new()),
            notion_database_id: Some(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notion_api_key.is_none() && self.notion_database_id.is_none()
    }
}

#[async_trait]
impl SettingsApi for ApiClient {
    async fn settings(&self) -> Result<Settings, ConsoleError> {
        self.send_json(self.request(Method::GET, SETTINGS_PATH)).await
    }

    async fn save_notion_settings(&self, update: &NotionSettingsUpdate) -> Result<(), ConsoleError> {
        let request = self.request(Method::POST, SETTINGS_PATH).json(update);
        self.send_empty(request).await
    }
}

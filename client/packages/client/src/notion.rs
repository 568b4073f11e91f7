use agent_console_error::{ConsoleError, ErrorBody};
use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::IntegrationApi;
use crate::http::{decode, ApiClient};

pub const DEFAULT_TASK_LIMIT: usize = 100;
pub const DEFAULT_STATUS_PROPERTY: &str = "Status";

const TASKS_PATH: &str = "/api/notion/tasks";
const UPDATE_STATUS_PATH: &str = "/api/notion/update-status";
const TEST_CONNECTION_PATH: &str = "/api/notion/test-connection";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct NotionTask {
    pub page_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct NotionTaskList {
    pub tasks: Vec<NotionTask>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct UpdateStatusRequest {
    pub page_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct UpdateStatusResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ConnectionTestResponse {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[async_trait]
impl IntegrationApi for ApiClient {
    async fn list_tasks(
        &self,
        status_filter: Option<&str>,
        limit: usize,
    ) -> Result<NotionTaskList, ConsoleError> {
        let mut request = self.request(Method::GET, TASKS_PATH);
        if let Some(filter) = status_filter.filter(|value| !value.is_empty()) {
            request = request.query(&[("status_filter", filter)]);
        }
        request = request.query(&[("limit", limit)]);
        let list: NotionTaskList = self.send_json(request).await?;
        tracing::debug!(count = list.tasks.len(), total = list.total, "fetched notion tasks");
        Ok(list)
    }

    async fn update_status(
        &self,
        page_id: &str,
        status: &str,
        status_property_name: &str,
    ) -> Result<UpdateStatusResponse, ConsoleError> {
        let body = UpdateStatusRequest {
            page_id: page_id.to_string(),
            status: status.to_string(),
            status_property_name: Some(status_property_name.to_string()),
        };
        let request = self.request(Method::POST, UPDATE_STATUS_PATH).json(&body);
        self.send_json(request).await
    }

    async fn test_connection(&self) -> Result<ConnectionTestResponse, ConsoleError> {
        let raw = self
            .send_raw(self.request(Method::GET, TEST_CONNECTION_PATH))
            .await?;
        if !(200..300).contains(&raw.status) {
            return Err(
                ConsoleError::from_response_body(raw.status, &raw.text).unwrap_or_else(|| {
                    ConsoleError::transport(Some(raw.status), "connection test failed")
                }),
            );
        }
        // `{connected: false, error}` is an answer, not a failure: only a body
        // without `connected` falls through to the error-body check.
        let body: Value = decode(&raw.text)?;
        if body.get("connected").is_some() {
            return serde_json::from_value(body)
                .map_err(|err| ConsoleError::invalid_response(err.to_string()));
        }
        match ErrorBody::detect(&body) {
            Some(error_body) => Err(ConsoleError::api(Some(raw.status), error_body.error)),
            None => Err(ConsoleError::invalid_response(
                "connection test response is missing `connected`",
            )),
        }
    }
}

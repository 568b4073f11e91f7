use agent_console_credentials::{ProviderId, ReconciliationRequest};
use agent_console_error::ConsoleError;
use async_trait::async_trait;

use crate::notion::{ConnectionTestResponse, NotionTaskList, UpdateStatusResponse};
use crate::settings::{NotionSettingsUpdate, Settings};

#[async_trait]
pub trait SandboxApi: Send + Sync {
    async fn pause(&self, conversation_id: &str) -> Result<(), ConsoleError>;

    /// `providers` are the caller's linked providers, needed to restore
    /// provider context inside the resumed sandbox.
    async fn resume(&self, conversation_id: &str, providers: &[ProviderId])
        -> Result<(), ConsoleError>;
}

#[async_trait]
pub trait GitProviderApi: Send + Sync {
    async fn reconcile(&self, request: &ReconciliationRequest) -> Result<(), ConsoleError>;
}

#[async_trait]
pub trait IntegrationApi: Send + Sync {
    async fn list_tasks(
        &self,
        status_filter: Option<&str>,
        limit: usize,
    ) -> Result<NotionTaskList, ConsoleError>;

    async fn update_status(
        &self,
        page_id: &str,
        status: &str,
        status_property_name: &str,
    ) -> Result<UpdateStatusResponse, ConsoleError>;

    /// A "not connected" answer is a normal `Ok` result.
    async fn test_connection(&self) -> Result<ConnectionTestResponse, ConsoleError>;
}

#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn settings(&self) -> Result<Settings, ConsoleError>;

    async fn save_notion_settings(&self, update: &NotionSettingsUpdate) -> Result<(), ConsoleError>;
}

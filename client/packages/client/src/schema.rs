//! OpenAPI component schemas for every wire type this client sends or reads.

use agent_console_credentials::{
    CredentialReconciliationPayload, ProviderId, ProviderToken, ProviderTokensRequest,
};
use agent_console_error::{ErrorBody, ErrorKind, Notification, NotificationLevel};
use utoipa::OpenApi;

use crate::notion::{
    ConnectionTestResponse, NotionTask, NotionTaskList, UpdateStatusRequest, UpdateStatusResponse,
};
use crate::sandbox::ResumeRequest;
use crate::settings::{NotionSettingsUpdate, Settings};

#[derive(OpenApi)]
#[openapi(
    info(title = "agent-console client contract"),
    components(schemas(
        ErrorBody,
        ErrorKind,
        Notification,
        NotificationLevel,
        ProviderId,
        ProviderToken,
        CredentialReconciliationPayload,
        ProviderTokensRequest,
        ResumeRequest,
        NotionTask,
        NotionTaskList,
        UpdateStatusRequest,
        UpdateStatusResponse,
        ConnectionTestResponse,
        Settings,
        NotionSettingsUpdate,
    ))
)]
pub struct ClientContract;

pub fn openapi_json() -> Result<String, serde_json::Error> {
    ClientContract::openapi().to_pretty_json()
}

/// JSON Schema for the provider save body, for backends validating requests.
pub fn provider_tokens_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(ProviderTokensRequest)
}

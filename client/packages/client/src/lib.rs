//! Async HTTP client for the console backend: sandbox pause/resume, git
//! provider reconciliation, settings, and the Notion task integration.

mod api;
mod config;
mod http;
mod notion;
mod providers;
mod sandbox;
pub mod schema;
mod settings;

pub use api::{GitProviderApi, IntegrationApi, SandboxApi, SettingsApi};
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_TOKEN};
pub use http::ApiClient;
pub use notion::{
    ConnectionTestResponse, NotionTask, NotionTaskList, UpdateStatusRequest, UpdateStatusResponse,
    DEFAULT_STATUS_PROPERTY, DEFAULT_TASK_LIMIT,
};
pub use sandbox::ResumeRequest;
pub use settings::{NotionSettingsUpdate, Settings};
